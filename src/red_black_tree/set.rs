use crate::compare::{Comparator, Natural};
use crate::error::Result;
use crate::red_black_tree::iter::{IntoIter, Iter, MorrisIter};
use crate::red_black_tree::tree::{Postorder, Tree, Violation, DEFAULT_CHUNK_SIZE};
use log::debug;
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::ptr;
use std::result;

/// An ordered set implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors each node red or black.
/// No red node has a red child and every path from the root to a leaf passes through the same
/// number of black nodes, which bounds the height of the tree to `2 * log2(n + 1)`.
///
/// Elements are ordered by a `Comparator` chosen when the set is created. Elements that compare
/// equal are the same element, so inserting a duplicate leaves the set unchanged.
///
/// The set performs no internal synchronization. Sharing it between threads requires external
/// locking.
///
/// # Examples
///
/// ```
/// use rbtree_set::red_black_tree::RedBlackSet;
///
/// let mut set = RedBlackSet::new();
/// set.insert(0).unwrap();
/// set.insert(3).unwrap();
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
///
/// assert_eq!(set.remove(&0), Some(0));
/// assert_eq!(set.remove(&1), None);
/// ```
pub struct RedBlackSet<T, C = Natural> {
    tree: Tree<T, C>,
}

impl<T> RedBlackSet<T>
where
    T: Ord,
{
    /// Constructs a new, empty `RedBlackSet<T>` ordered by `T`'s `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C> RedBlackSet<T, C> {
    /// Constructs a new, empty set ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::with_comparator(|a: &u32, b: &u32| b.cmp(a));
    /// set.insert(1).unwrap();
    /// set.insert(2).unwrap();
    /// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&2, &1]);
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_chunk_size(cmp, DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty set ordered by `cmp` whose nodes are allocated `chunk_size` at a
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(cmp: C, chunk_size: usize) -> Self {
        RedBlackSet {
            tree: Tree::new(cmp, chunk_size),
        }
    }

    /// Returns the comparator that orders the set.
    pub fn comparator(&self) -> &C {
        &self.tree.cmp
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.len == 0
    }

    /// Clears the set, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// set.insert(2).unwrap();
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Destroys the set, handing every element to `f`. Elements are visited bottom-up: both
    /// subtrees of a node are released before the node itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(2).unwrap();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    ///
    /// let mut released = Vec::new();
    /// set.destroy_with(|elem| released.push(elem));
    /// assert_eq!(released, vec![1, 3, 2]);
    /// ```
    pub fn destroy_with<F>(mut self, f: F)
    where
        F: FnMut(T),
    {
        self.tree.drain_postorder(f);
    }

    /// Returns the minimum element of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.tree.min().map(|index| &self.tree.arena[index].elem)
    }

    /// Returns the maximum element of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    /// assert_eq!(set.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.tree.max().map(|index| &self.tree.arena[index].elem)
    }

    /// Returns an iterator over the set. The iterator yields elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.tree)
    }

    /// Returns a stack-free iterator over the set that threads the tree while it walks it. See
    /// `MorrisIter` for details.
    pub fn morris_iter(&mut self) -> MorrisIter<'_, T, C> {
        MorrisIter::new(&mut self.tree)
    }
}

impl<T, C> RedBlackSet<T, C>
where
    C: Comparator<T>,
{
    /// Inserts an element into the set. Returns `Ok(None)` if the element was added. If the set
    /// already holds an equal element, the set is left unchanged, `elem` is dropped and a
    /// reference to the stored element is returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if no memory could be reserved for the new node.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// assert_eq!(set.insert(1).unwrap(), None);
    /// assert!(set.contains(&1));
    /// assert_eq!(set.insert(1).unwrap(), Some(&1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, elem: T) -> Result<Option<&T>> {
        match self.tree.insert(elem)? {
            Some(index) => Ok(Some(&self.tree.arena[index].elem)),
            None => Ok(None),
        }
    }

    /// Returns the stored element that is equal to `elem`, or `None` if there is no such element.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::compare::CaseInsensitive;
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::with_comparator(CaseInsensitive);
    /// set.insert("Hello").unwrap();
    /// assert_eq!(set.get(&"hello"), Some(&"Hello"));
    /// assert_eq!(set.get(&"world"), None);
    /// ```
    pub fn get(&self, elem: &T) -> Option<&T> {
        self.tree
            .find(elem)
            .map(|index| &self.tree.arena[index].elem)
    }

    /// Checks if an element equal to `elem` exists in the set.
    pub fn contains(&self, elem: &T) -> bool {
        self.tree.find(elem).is_some()
    }

    /// Removes the element equal to `elem` from the set and returns it. Returns `None` if there
    /// is no such element.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove(&mut self, elem: &T) -> Option<T> {
        self.tree.remove(elem)
    }

    /// Returns the greatest element that is less than or equal to `elem`. Returns `None` if such
    /// an element does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor(&self, elem: &T) -> Option<&T> {
        self.tree
            .floor(elem)
            .map(|index| &self.tree.arena[index].elem)
    }

    /// Returns the least element that is greater than or equal to `elem`. Returns `None` if such
    /// an element does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.ceil(&0), Some(&1));
    /// assert_eq!(set.ceil(&2), None);
    /// ```
    pub fn ceil(&self, elem: &T) -> Option<&T> {
        self.tree
            .ceil(elem)
            .map(|index| &self.tree.arena[index].elem)
    }

    /// Verifies the red black tree properties and the order of the elements. Returns the number
    /// of black nodes on every path from the root to a leaf.
    ///
    /// This walks the entire tree and is meant for tests and debugging.
    pub fn validate(&self) -> result::Result<usize, Violation> {
        self.tree.validate()
    }
}

impl<T, C> RedBlackSet<T, C>
where
    T: Clone,
    C: Comparator<T> + Clone,
{
    /// Returns a copy of the set with the same shape. Elements are cloned, so a set of `Rc<_>` or
    /// `&_` shares its elements with the copy.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if the copy could not be allocated.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(RedBlackSet {
            tree: self.tree.copy()?,
        })
    }

    /// Returns the union of two sets: every element that is in `left` or in `right`.
    ///
    /// The larger set is copied node for node and the elements of the smaller set are then
    /// inserted into the copy. Both sets must order their elements the same way; the result uses
    /// the comparator of the copied set.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if the result could not be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut n = RedBlackSet::new();
    /// n.insert(1).unwrap();
    /// n.insert(2).unwrap();
    ///
    /// let mut m = RedBlackSet::new();
    /// m.insert(2).unwrap();
    /// m.insert(3).unwrap();
    ///
    /// let union = RedBlackSet::union(&n, &m).unwrap();
    /// assert_eq!(
    ///     union.iter().collect::<Vec<&u32>>(),
    ///     vec![&1, &2, &3],
    /// );
    /// ```
    pub fn union(left: &Self, right: &Self) -> Result<Self> {
        if ptr::eq(left, right) {
            return left.try_clone();
        }

        let (larger, smaller) = if left.len() < right.len() {
            (right, left)
        } else {
            (left, right)
        };
        debug!(
            "Union copies a set of {} elements and merges {} elements into it.",
            larger.len(),
            smaller.len(),
        );

        let mut tree = larger.tree.copy()?;
        // Right subtree, then left subtree, then the node.
        smaller
            .tree
            .walk_postorder(smaller.tree.root, Postorder::RightLeft, &mut |elem: &T| {
                tree.insert(elem.clone()).map(|_| ())
            })?;
        Ok(RedBlackSet { tree })
    }

    /// Returns the intersection of two sets: every element that is in both `left` and `right`.
    ///
    /// The smaller set is walked and each of its elements is looked up in the larger set. The
    /// result uses the comparator of `left`.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if the result could not be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut n = RedBlackSet::new();
    /// n.insert(1).unwrap();
    /// n.insert(2).unwrap();
    ///
    /// let mut m = RedBlackSet::new();
    /// m.insert(2).unwrap();
    /// m.insert(3).unwrap();
    ///
    /// let intersection = RedBlackSet::intersection(&n, &m).unwrap();
    /// assert_eq!(
    ///     intersection.iter().collect::<Vec<&u32>>(),
    ///     vec![&2],
    /// );
    /// ```
    pub fn intersection(left: &Self, right: &Self) -> Result<Self> {
        if ptr::eq(left, right) {
            return left.try_clone();
        }

        let (smaller, larger) = if left.len() <= right.len() {
            (left, right)
        } else {
            (right, left)
        };
        debug!(
            "Intersection walks {} elements and searches a set of {} elements.",
            smaller.len(),
            larger.len(),
        );

        let mut tree = left.tree.empty_like();
        smaller
            .tree
            .walk_postorder(smaller.tree.root, Postorder::LeftRight, &mut |elem: &T| {
                if larger.contains(elem) {
                    tree.insert(elem.clone())?;
                }
                Ok(())
            })?;
        Ok(RedBlackSet { tree })
    }

    /// Returns the difference of `left` and `right`: every element of `left` that is not in
    /// `right`. The result uses the comparator of `left`.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if the result could not be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut n = RedBlackSet::new();
    /// n.insert(1).unwrap();
    /// n.insert(2).unwrap();
    ///
    /// let mut m = RedBlackSet::new();
    /// m.insert(2).unwrap();
    /// m.insert(3).unwrap();
    ///
    /// let difference = RedBlackSet::difference(&n, &m).unwrap();
    /// assert_eq!(
    ///     difference.iter().collect::<Vec<&u32>>(),
    ///     vec![&1],
    /// );
    /// ```
    pub fn difference(left: &Self, right: &Self) -> Result<Self> {
        let mut tree = left.tree.empty_like();
        if ptr::eq(left, right) {
            return Ok(RedBlackSet { tree });
        }

        left.tree
            .walk_postorder(left.tree.root, Postorder::LeftRight, &mut |elem: &T| {
                if !right.contains(elem) {
                    tree.insert(elem.clone())?;
                }
                Ok(())
            })?;
        Ok(RedBlackSet { tree })
    }

    /// Returns the symmetric difference of `left` and `right`: every element that is in exactly
    /// one of the two sets. The result uses the comparator of `left`.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if the result could not be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::red_black_tree::RedBlackSet;
    ///
    /// let mut n = RedBlackSet::new();
    /// n.insert(1).unwrap();
    /// n.insert(2).unwrap();
    ///
    /// let mut m = RedBlackSet::new();
    /// m.insert(2).unwrap();
    /// m.insert(3).unwrap();
    ///
    /// let symmetric_difference = RedBlackSet::symmetric_difference(&n, &m).unwrap();
    /// assert_eq!(
    ///     symmetric_difference.iter().collect::<Vec<&u32>>(),
    ///     vec![&1, &3],
    /// );
    /// ```
    pub fn symmetric_difference(left: &Self, right: &Self) -> Result<Self> {
        let mut set = Self::difference(left, right)?;
        if ptr::eq(left, right) {
            return Ok(set);
        }

        right
            .tree
            .walk_postorder(right.tree.root, Postorder::LeftRight, &mut |elem: &T| {
                if !left.contains(elem) {
                    set.tree.insert(elem.clone())?;
                }
                Ok(())
            })?;
        Ok(set)
    }
}

impl<T, C> IntoIterator for RedBlackSet<T, C> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.tree)
    }
}

impl<'a, T, C> IntoIterator for &'a RedBlackSet<T, C>
where
    T: 'a,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> Default for RedBlackSet<T, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C> fmt::Debug for RedBlackSet<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> PartialEq for RedBlackSet<T, C>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, C> Eq for RedBlackSet<T, C> where T: Eq {}

impl<T, C> Serialize for RedBlackSet<T, C>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for elem in self.iter() {
            seq.serialize_element(elem)?;
        }
        seq.end()
    }
}

struct RedBlackSetVisitor<T, C> {
    marker: PhantomData<fn() -> RedBlackSet<T, C>>,
}

impl<'de, T, C> Visitor<'de> for RedBlackSetVisitor<T, C>
where
    T: Deserialize<'de>,
    C: Comparator<T> + Default,
{
    type Value = RedBlackSet<T, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of set elements")
    }

    fn visit_seq<A>(self, mut seq: A) -> result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = RedBlackSet::default();
        while let Some(elem) = seq.next_element()? {
            set.insert(elem)
                .map_err(|err| <A::Error as de::Error>::custom(err))?;
        }
        Ok(set)
    }
}

impl<'de, T, C> Deserialize<'de> for RedBlackSet<T, C>
where
    T: Deserialize<'de>,
    C: Comparator<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(RedBlackSetVisitor {
            marker: PhantomData,
        })
    }
}
