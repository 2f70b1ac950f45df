//! An ordered set backed by a red black tree.
//!
//! Elements are ordered by a caller-supplied `Comparator`. Nodes live in a typed arena and refer
//! to each other by index, so rotations and rebalancing never touch raw pointers. Besides the
//! usual insert, search and removal, the set supports union, intersection and difference, and
//! can be walked either with a stack-based iterator or with a stack-free Morris iterator.
//!
//! # Examples
//!
//! ```
//! use rbtree_set::red_black_tree::RedBlackSet;
//!
//! let mut evens = RedBlackSet::new();
//! let mut odds = RedBlackSet::new();
//! for i in 0..10 {
//!     if i % 2 == 0 {
//!         evens.insert(i).unwrap();
//!     } else {
//!         odds.insert(i).unwrap();
//!     }
//! }
//!
//! let all = RedBlackSet::union(&evens, &odds).unwrap();
//! assert_eq!(all.len(), 10);
//! assert!(RedBlackSet::intersection(&evens, &odds).unwrap().is_empty());
//! assert_eq!(RedBlackSet::difference(&all, &odds).unwrap(), evens);
//! ```

pub mod arena;
pub mod compare;
mod error;
pub mod red_black_tree;

pub use self::error::{Error, Result};
