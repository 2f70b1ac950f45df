use crate::arena::{Index, TypedArena};
use crate::red_black_tree::node::Node;
use crate::red_black_tree::tree::{self, Tree};
use std::mem;

/// An iterator over the elements of a `RedBlackSet<T, C>`.
///
/// This iterator traverses the elements of the set in ascending order and yields immutable
/// references. It keeps an explicit stack of at most the height of the tree.
pub struct Iter<'a, T> {
    arena: &'a TypedArena<Node<T>>,
    current: Option<Index>,
    stack: Vec<Index>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new<C>(tree: &'a Tree<T, C>) -> Self {
        Iter {
            arena: &tree.arena,
            current: tree.root,
            stack: Vec::new(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        while let Some(index) = self.current {
            self.stack.push(index);
            self.current = arena[index].left;
        }
        self.stack.pop().map(|index| {
            self.current = tree::right_child(arena, index);
            &arena[index].elem
        })
    }
}

/// An owning iterator for `RedBlackSet<T, C>`.
///
/// This iterator traverses the elements of the set in ascending order and yields owned elements.
pub struct IntoIter<T> {
    arena: TypedArena<Node<T>>,
    current: Option<Index>,
    stack: Vec<Index>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new<C>(mut tree: Tree<T, C>) -> Self {
        tree.strip_threads();
        let arena = mem::replace(&mut tree.arena, TypedArena::new(tree.chunk_size));
        IntoIter {
            arena,
            current: tree.root.take(),
            stack: Vec::new(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.current {
            self.stack.push(index);
            self.current = self.arena[index].left;
        }
        self.stack.pop().map(|index| {
            let node = self.arena.free(&index);
            self.current = node.right;
            node.elem
        })
    }
}

/// A stack-free iterator over the elements of a `RedBlackSet<T, C>`.
///
/// Morris traversal walks the tree in ascending order without a stack by temporarily threading
/// the rightmost node of each left subtree to its in-order successor. The iterator borrows the
/// set mutably, so the set cannot be modified and no second iterator can be created while it is
/// alive. Dropping the iterator drives the traversal to its end, which removes every thread.
///
/// Because each element is returned while the tree is being rethreaded, `next` lends the element
/// for the duration of the borrow of the iterator instead of implementing `Iterator`.
///
/// # Examples
///
/// ```
/// use rbtree_set::red_black_tree::RedBlackSet;
///
/// let mut set = RedBlackSet::new();
/// set.insert(2).unwrap();
/// set.insert(1).unwrap();
///
/// let mut iter = set.morris_iter();
/// assert!(iter.has_next());
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next(), Some(&2));
/// assert!(!iter.has_next());
/// assert_eq!(iter.next(), None);
/// ```
pub struct MorrisIter<'a, T, C> {
    tree: &'a mut Tree<T, C>,
    current: Option<Index>,
}

impl<'a, T, C> MorrisIter<'a, T, C> {
    pub(crate) fn new(tree: &'a mut Tree<T, C>) -> Self {
        tree.strip_threads();
        tree.iterators += 1;
        let current = tree.root;
        MorrisIter { tree, current }
    }

    fn step(&mut self) -> Option<Index> {
        let arena = &mut self.tree.arena;
        loop {
            let curr = self.current?;
            let left = match arena[curr].left {
                Some(left) => left,
                None => {
                    self.current = arena[curr].right;
                    return Some(curr);
                },
            };

            let mut pre = left;
            while let Some(right) = arena[pre].right {
                if right == curr {
                    break;
                }
                pre = right;
            }

            if arena[pre].right.is_none() {
                arena[pre].right = Some(curr);
                self.current = Some(left);
            } else {
                arena[pre].right = None;
                self.current = arena[curr].right;
                return Some(curr);
            }
        }
    }

    /// Returns `true` if another element remains.
    pub fn has_next(&self) -> bool {
        self.current.is_some()
    }

    /// Returns the next element in ascending order, or `None` once every element was yielded.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        let index = self.step()?;
        Some(&self.tree.arena[index].elem)
    }

    /// Finishes the current traversal and restarts from the smallest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// set.insert(2).unwrap();
    ///
    /// let mut iter = set.morris_iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// iter.reset();
    /// assert_eq!(iter.next(), Some(&1));
    /// ```
    pub fn reset(&mut self) {
        while self.step().is_some() {}
        self.current = self.tree.root;
    }
}

impl<'a, T, C> Drop for MorrisIter<'a, T, C> {
    fn drop(&mut self) {
        while self.step().is_some() {}
        self.tree.iterators -= 1;
    }
}
