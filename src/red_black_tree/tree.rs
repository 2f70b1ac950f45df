use crate::arena::{Index, TypedArena};
use crate::compare::Comparator;
use crate::error::Result;
use crate::red_black_tree::iter::Iter;
use crate::red_black_tree::node::{Color, Node};
use log::{error, warn};
use std::cmp::Ordering;
use std::error;
use std::fmt;
use std::mem;
use std::result;

/// Number of nodes reserved per arena chunk when no chunk size is given.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Child visiting order of a postorder walk. The node itself is always visited last.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Postorder {
    LeftRight,
    RightLeft,
}

/// A broken red black tree property, as reported by `Tree::validate`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Violation {
    /// The root node is red.
    RedRoot,
    /// A red node has a red child.
    RedChildOfRed,
    /// Two root-to-leaf paths pass through a different number of black nodes.
    BlackHeightMismatch { expected: usize, found: usize },
    /// A child does not link back to its parent, or the root has a parent.
    BrokenParentLink,
    /// An in-order walk does not yield strictly ascending elements.
    OutOfOrder,
    /// The number of reachable nodes differs from the recorded length.
    LengthMismatch { expected: usize, found: usize },
}

impl error::Error for Violation {}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Violation::RedRoot => write!(f, "root node is red"),
            Violation::RedChildOfRed => write!(f, "red node has a red child"),
            Violation::BlackHeightMismatch { expected, found } => write!(
                f,
                "expected {} black nodes on every path, found {}",
                expected, found,
            ),
            Violation::BrokenParentLink => write!(f, "parent link does not match child link"),
            Violation::OutOfOrder => write!(f, "elements are not in strictly ascending order"),
            Violation::LengthMismatch { expected, found } => write!(
                f,
                "expected {} reachable nodes, found {}",
                expected, found,
            ),
        }
    }
}

/// Returns the right child of a node, ignoring a Morris thread stored in its right link.
pub fn right_child<T>(arena: &TypedArena<Node<T>>, index: Index) -> Option<Index> {
    arena[index]
        .right
        .filter(|&child| arena[child].parent == Some(index))
}

/// A red black tree whose nodes live in a `TypedArena`.
///
/// Right links may temporarily point back at an in-order successor while a `MorrisIter` is
/// active. Such a thread is recognizable because the target's parent link never points at the
/// threading node, and every reader other than `MorrisIter` goes through `right_of`, which
/// ignores threads.
pub struct Tree<T, C> {
    pub(crate) arena: TypedArena<Node<T>>,
    pub(crate) root: Option<Index>,
    pub(crate) cmp: C,
    pub(crate) len: usize,
    pub(crate) iterators: usize,
    pub(crate) chunk_size: usize,
}

impl<T, C> Tree<T, C> {
    pub fn new(cmp: C, chunk_size: usize) -> Self {
        Tree {
            arena: TypedArena::new(chunk_size),
            root: None,
            cmp,
            len: 0,
            iterators: 0,
            chunk_size,
        }
    }

    pub fn is_red(&self, link: Option<Index>) -> bool {
        link.map_or(false, |index| self.arena[index].is_red())
    }

    pub fn right_of(&self, index: Index) -> Option<Index> {
        right_child(&self.arena, index)
    }

    pub fn leftmost(&self, mut index: Index) -> Index {
        while let Some(left) = self.arena[index].left {
            index = left;
        }
        index
    }

    pub fn rightmost(&self, mut index: Index) -> Index {
        while let Some(right) = self.right_of(index) {
            index = right;
        }
        index
    }

    pub fn min(&self) -> Option<Index> {
        self.root.map(|root| self.leftmost(root))
    }

    pub fn max(&self) -> Option<Index> {
        self.root.map(|root| self.rightmost(root))
    }

    // Makes `new` take the place of `old` in the child links of `parent`.
    fn replace_child(&mut self, parent: Option<Index>, old: Index, new: Option<Index>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                if self.arena[parent].left == Some(old) {
                    self.arena[parent].left = new;
                } else {
                    self.arena[parent].right = new;
                }
            },
        }
    }

    pub fn rotate_left(&mut self, node: Index) {
        let child = self.arena[node]
            .right
            .expect("Expected right child node to be `Some`.");

        let moved = self.arena[child].left;
        self.arena[node].right = moved;
        if let Some(moved) = moved {
            self.arena[moved].parent = Some(node);
        }

        let parent = self.arena[node].parent;
        self.arena[child].parent = parent;
        self.replace_child(parent, node, Some(child));

        self.arena[child].left = Some(node);
        self.arena[node].parent = Some(child);
    }

    pub fn rotate_right(&mut self, node: Index) {
        let child = self.arena[node]
            .left
            .expect("Expected left child node to be `Some`.");

        let moved = self.arena[child].right;
        self.arena[node].left = moved;
        if let Some(moved) = moved {
            self.arena[moved].parent = Some(node);
        }

        let parent = self.arena[node].parent;
        self.arena[child].parent = parent;
        self.replace_child(parent, node, Some(child));

        self.arena[child].right = Some(node);
        self.arena[node].parent = Some(child);
    }

    fn flip_colors(&mut self, index: Index) {
        let node = &mut self.arena[index];
        node.color = node.color.flip();
        let (left, right) = (node.left, node.right);
        for child in left.into_iter().chain(right) {
            let child = &mut self.arena[child];
            child.color = child.color.flip();
        }
    }

    fn transplant(&mut self, old: Index, new: Option<Index>) {
        let parent = self.arena[old].parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.arena[new].parent = parent;
        }
    }

    /// Removes threads left behind by a Morris iterator that was never driven to completion.
    pub fn strip_threads(&mut self) {
        if self.iterators == 0 {
            return;
        }
        warn!(
            "{} iterator(s) were abandoned without being dropped, removing leftover threads.",
            self.iterators,
        );
        let threaded: Vec<Index> = self
            .arena
            .indices()
            .filter(|&index| {
                self.arena[index]
                    .right
                    .map_or(false, |child| self.arena[child].parent != Some(index))
            })
            .collect();
        for index in threaded {
            self.arena[index].right = None;
        }
        self.iterators = 0;
    }

    pub fn clear(&mut self) {
        self.strip_threads();
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    fn drain_subtree<F>(&mut self, link: Option<Index>, f: &mut F)
    where
        F: FnMut(T),
    {
        if let Some(index) = link {
            let (left, right) = (self.arena[index].left, self.arena[index].right);
            self.drain_subtree(left, f);
            self.drain_subtree(right, f);
            f(self.arena.free(&index).elem);
        }
    }

    /// Frees every node bottom-up (left subtree, right subtree, then the node itself), handing
    /// each element to `f`.
    pub fn drain_postorder<F>(&mut self, mut f: F)
    where
        F: FnMut(T),
    {
        self.strip_threads();
        let root = self.root.take();
        self.drain_subtree(root, &mut f);
        self.len = 0;
    }

    /// Calls `f` on every element in postorder, stopping at the first error.
    pub fn walk_postorder<F>(&self, link: Option<Index>, order: Postorder, f: &mut F) -> Result<()>
    where
        F: FnMut(&T) -> Result<()>,
    {
        if let Some(index) = link {
            let (left, right) = (self.arena[index].left, self.right_of(index));
            let (first, second) = match order {
                Postorder::LeftRight => (left, right),
                Postorder::RightLeft => (right, left),
            };
            self.walk_postorder(first, order, f)?;
            self.walk_postorder(second, order, f)?;
            f(&self.arena[index].elem)?;
        }
        Ok(())
    }
}

impl<T, C> Tree<T, C>
where
    C: Comparator<T>,
{
    pub fn find(&self, elem: &T) -> Option<Index> {
        let mut curr = self.root;
        while let Some(index) = curr {
            curr = match self.cmp.compare(elem, &self.arena[index].elem) {
                Ordering::Less => self.arena[index].left,
                Ordering::Greater => self.right_of(index),
                Ordering::Equal => return Some(index),
            };
        }
        None
    }

    pub fn floor(&self, elem: &T) -> Option<Index> {
        let mut curr = self.root;
        let mut best = None;
        while let Some(index) = curr {
            curr = match self.cmp.compare(elem, &self.arena[index].elem) {
                Ordering::Less => self.arena[index].left,
                Ordering::Greater => {
                    best = Some(index);
                    self.right_of(index)
                },
                Ordering::Equal => return Some(index),
            };
        }
        best
    }

    pub fn ceil(&self, elem: &T) -> Option<Index> {
        let mut curr = self.root;
        let mut best = None;
        while let Some(index) = curr {
            curr = match self.cmp.compare(elem, &self.arena[index].elem) {
                Ordering::Less => {
                    best = Some(index);
                    self.arena[index].left
                },
                Ordering::Greater => self.right_of(index),
                Ordering::Equal => return Some(index),
            };
        }
        best
    }

    /// Inserts `elem` unless an equal element is already present. Returns the index of the
    /// existing element in that case, and `None` if a new node was created.
    pub fn insert(&mut self, elem: T) -> Result<Option<Index>> {
        self.strip_threads();

        let mut parent = None;
        let mut ordering = Ordering::Equal;
        let mut curr = self.root;
        while let Some(index) = curr {
            ordering = self.cmp.compare(&elem, &self.arena[index].elem);
            parent = Some(index);
            curr = match ordering {
                Ordering::Less => self.arena[index].left,
                Ordering::Greater => self.arena[index].right,
                Ordering::Equal => return Ok(Some(index)),
            };
        }

        let color = if parent.is_none() { Color::Black } else { Color::Red };
        let index = self
            .arena
            .allocate(Node::new(elem, color, parent))
            .map_err(|err| {
                error!("Unable to insert into a set of {} elements: {}", self.len, err);
                err
            })?;

        match parent {
            None => self.root = Some(index),
            Some(parent) => {
                if ordering == Ordering::Less {
                    self.arena[parent].left = Some(index);
                } else {
                    self.arena[parent].right = Some(index);
                }
            },
        }
        self.len += 1;
        self.insert_fixup(index);
        Ok(None)
    }

    fn insert_fixup(&mut self, mut curr: Index) {
        while let Some(mut parent) = self.arena[curr].parent.filter(|&p| self.arena[p].is_red()) {
            let grandparent = match self.arena[parent].parent {
                Some(grandparent) => grandparent,
                None => break,
            };

            if self.arena[grandparent].left == Some(parent) {
                if self.is_red(self.arena[grandparent].right) {
                    self.flip_colors(grandparent);
                    curr = grandparent;
                    continue;
                }
                if self.arena[parent].right == Some(curr) {
                    self.rotate_left(parent);
                    mem::swap(&mut curr, &mut parent);
                }
                self.rotate_right(grandparent);
            } else {
                if self.is_red(self.arena[grandparent].left) {
                    self.flip_colors(grandparent);
                    curr = grandparent;
                    continue;
                }
                if self.arena[parent].left == Some(curr) {
                    self.rotate_right(parent);
                    mem::swap(&mut curr, &mut parent);
                }
                self.rotate_left(grandparent);
            }

            self.arena[parent].color = Color::Black;
            self.arena[grandparent].color = Color::Red;
            break;
        }

        if let Some(root) = self.root {
            self.arena[root].color = Color::Black;
        }
    }

    /// Removes the element equal to `elem` and returns it.
    pub fn remove(&mut self, elem: &T) -> Option<T> {
        self.strip_threads();
        let target = self.find(elem)?;

        let (left, right) = (self.arena[target].left, self.arena[target].right);
        let mut removed_color = self.arena[target].color;
        let child;
        let child_parent;

        match (left, right) {
            (None, _) => {
                child = right;
                child_parent = self.arena[target].parent;
                self.transplant(target, right);
            },
            (_, None) => {
                child = left;
                child_parent = self.arena[target].parent;
                self.transplant(target, left);
            },
            (Some(left), Some(right)) => {
                let successor = self.leftmost(right);
                removed_color = self.arena[successor].color;
                child = self.arena[successor].right;

                if successor == right {
                    child_parent = Some(successor);
                } else {
                    child_parent = self.arena[successor].parent;
                    self.transplant(successor, child);
                    self.arena[successor].right = Some(right);
                    self.arena[right].parent = Some(successor);
                }

                self.transplant(target, Some(successor));
                self.arena[successor].left = Some(left);
                self.arena[left].parent = Some(successor);
                self.arena[successor].color = self.arena[target].color;
            },
        }

        let node = self.arena.free(&target);
        self.len -= 1;
        if removed_color == Color::Black {
            self.remove_fixup(child, child_parent);
        }
        Some(node.elem)
    }

    // `child` carries an extra black. `parent` is tracked separately because `child` may be a
    // leaf.
    fn remove_fixup(&mut self, mut child: Option<Index>, mut parent: Option<Index>) {
        while child != self.root && !self.is_red(child) {
            let curr_parent = match parent {
                Some(curr_parent) => curr_parent,
                None => break,
            };

            if child == self.arena[curr_parent].left {
                let mut sibling = self.arena[curr_parent]
                    .right
                    .expect("Expected a doubly black node to have a sibling.");
                if self.arena[sibling].is_red() {
                    self.arena[sibling].color = Color::Black;
                    self.arena[curr_parent].color = Color::Red;
                    self.rotate_left(curr_parent);
                    sibling = self.arena[curr_parent]
                        .right
                        .expect("Expected a doubly black node to have a sibling.");
                }

                if !self.is_red(self.arena[sibling].left) && !self.is_red(self.arena[sibling].right) {
                    self.arena[sibling].color = Color::Red;
                    child = Some(curr_parent);
                    parent = self.arena[curr_parent].parent;
                    continue;
                }

                if !self.is_red(self.arena[sibling].right) {
                    if let Some(near) = self.arena[sibling].left {
                        self.arena[near].color = Color::Black;
                    }
                    self.arena[sibling].color = Color::Red;
                    self.rotate_right(sibling);
                    sibling = self.arena[curr_parent]
                        .right
                        .expect("Expected a doubly black node to have a sibling.");
                }

                self.arena[sibling].color = self.arena[curr_parent].color;
                self.arena[curr_parent].color = Color::Black;
                if let Some(far) = self.arena[sibling].right {
                    self.arena[far].color = Color::Black;
                }
                self.rotate_left(curr_parent);
            } else {
                let mut sibling = self.arena[curr_parent]
                    .left
                    .expect("Expected a doubly black node to have a sibling.");
                if self.arena[sibling].is_red() {
                    self.arena[sibling].color = Color::Black;
                    self.arena[curr_parent].color = Color::Red;
                    self.rotate_right(curr_parent);
                    sibling = self.arena[curr_parent]
                        .left
                        .expect("Expected a doubly black node to have a sibling.");
                }

                if !self.is_red(self.arena[sibling].left) && !self.is_red(self.arena[sibling].right) {
                    self.arena[sibling].color = Color::Red;
                    child = Some(curr_parent);
                    parent = self.arena[curr_parent].parent;
                    continue;
                }

                if !self.is_red(self.arena[sibling].left) {
                    if let Some(near) = self.arena[sibling].right {
                        self.arena[near].color = Color::Black;
                    }
                    self.arena[sibling].color = Color::Red;
                    self.rotate_left(sibling);
                    sibling = self.arena[curr_parent]
                        .left
                        .expect("Expected a doubly black node to have a sibling.");
                }

                self.arena[sibling].color = self.arena[curr_parent].color;
                self.arena[curr_parent].color = Color::Black;
                if let Some(far) = self.arena[sibling].left {
                    self.arena[far].color = Color::Black;
                }
                self.rotate_right(curr_parent);
            }

            child = self.root;
            parent = None;
        }

        if let Some(child) = child {
            self.arena[child].color = Color::Black;
        }
    }

    /// Checks every red black tree property and returns the black height of the tree.
    pub fn validate(&self) -> result::Result<usize, Violation> {
        let root = match self.root {
            Some(root) => root,
            None if self.len == 0 => return Ok(0),
            None => {
                return Err(Violation::LengthMismatch {
                    expected: self.len,
                    found: 0,
                })
            },
        };

        if self.arena[root].parent.is_some() {
            return Err(Violation::BrokenParentLink);
        }
        if self.arena[root].is_red() {
            return Err(Violation::RedRoot);
        }

        let mut black_height = None;
        let mut count = 0;
        self.validate_subtree(Some(root), 0, &mut black_height, &mut count)?;
        if count != self.len {
            return Err(Violation::LengthMismatch {
                expected: self.len,
                found: count,
            });
        }

        let mut prev: Option<&T> = None;
        for elem in Iter::new(self) {
            if let Some(prev) = prev {
                if self.cmp.compare(prev, elem) != Ordering::Less {
                    return Err(Violation::OutOfOrder);
                }
            }
            prev = Some(elem);
        }

        Ok(black_height.unwrap_or(0))
    }

    fn validate_subtree(
        &self,
        link: Option<Index>,
        mut black_count: usize,
        black_height: &mut Option<usize>,
        count: &mut usize,
    ) -> result::Result<(), Violation> {
        let index = match link {
            Some(index) => index,
            None => {
                let expected = *black_height.get_or_insert(black_count);
                if expected != black_count {
                    return Err(Violation::BlackHeightMismatch {
                        expected,
                        found: black_count,
                    });
                }
                return Ok(());
            },
        };

        *count += 1;
        let node = &self.arena[index];
        let right = self.right_of(index);
        if node.is_red() {
            if self.is_red(node.left) || self.is_red(right) {
                return Err(Violation::RedChildOfRed);
            }
        } else {
            black_count += 1;
        }

        if let Some(left) = node.left {
            if self.arena[left].parent != Some(index) {
                return Err(Violation::BrokenParentLink);
            }
        }

        self.validate_subtree(node.left, black_count, black_height, count)?;
        self.validate_subtree(right, black_count, black_height, count)
    }
}

impl<T, C> Tree<T, C>
where
    T: Clone,
    C: Clone,
{
    /// Returns an empty tree with the same comparator and chunk size.
    pub fn empty_like(&self) -> Self {
        Tree::new(self.cmp.clone(), self.chunk_size)
    }

    /// Copies the tree node for node, keeping its shape and colors. No comparisons are made.
    pub fn copy(&self) -> Result<Self> {
        let mut tree = self.empty_like();
        tree.root = tree.copy_subtree(self, self.root, None)?;
        tree.len = self.len;
        Ok(tree)
    }

    fn copy_subtree(
        &mut self,
        source: &Self,
        link: Option<Index>,
        parent: Option<Index>,
    ) -> Result<Option<Index>> {
        let source_index = match link {
            Some(source_index) => source_index,
            None => return Ok(None),
        };
        let source_node = &source.arena[source_index];
        let index = self.arena.allocate(Node::new(
            source_node.elem.clone(),
            source_node.color,
            parent,
        ))?;
        let left = self.copy_subtree(source, source_node.left, Some(index))?;
        let right = self.copy_subtree(source, source.right_of(source_index), Some(index))?;
        self.arena[index].left = left;
        self.arena[index].right = right;
        Ok(Some(index))
    }
}

impl<T, C> Drop for Tree<T, C> {
    fn drop(&mut self) {
        if self.iterators != 0 {
            warn!(
                "Dropping a set that still has {} active iterator(s); an iterator was leaked.",
                self.iterators,
            );
        }
    }
}
