//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.

mod iter;
mod node;
mod set;
mod tree;

pub use self::iter::{IntoIter, Iter, MorrisIter};
pub use self::set::RedBlackSet;
pub use self::tree::{Violation, DEFAULT_CHUNK_SIZE};
