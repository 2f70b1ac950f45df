//! Chunked slab allocator that backs the nodes of a tree.

use crate::error::Result;
use std::mem;
use std::ops::{Index as IndexOp, IndexMut};
use std::vec::Vec;

/// A handle to an object allocated in a `TypedArena<T>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Index {
    chunk_index: usize,
    block_index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<Index>),
}

/// An allocator that only allocates a single type of object and hands out `Index` handles
/// instead of references.
///
/// Objects are stored in fixed-size chunks. A chunk is reserved in full when it is created and is
/// never reallocated afterwards, so growing the arena never moves existing objects. Freed blocks
/// are kept on a free list and are reused before any new chunk is reserved. Reserving a chunk is
/// fallible: if the allocator cannot satisfy the request, `allocate` returns
/// `Error::AllocationFailed` instead of aborting the process.
///
/// # Examples
///
/// ```
/// use rbtree_set::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1).unwrap();
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    head: Option<Index>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn block(&self, index: &Index) -> Option<&Block<T>> {
        self.chunks
            .get(index.chunk_index)
            .and_then(|chunk| chunk.get(index.block_index))
    }

    fn reserve_chunk(&mut self) -> Result<()> {
        let mut chunk = Vec::new();
        chunk.try_reserve_exact(self.chunk_size)?;
        self.chunks.try_reserve(1)?;
        self.chunks.push(chunk);
        self.capacity += self.chunk_size;
        Ok(())
    }

    /// Constructs a new, empty `TypedArena<T>` that stores `chunk_size` objects per chunk. No
    /// memory is reserved until the first allocation.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// assert_eq!(arena.len(), 0);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Expected a positive chunk size.");
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
        }
    }

    /// Allocates an object in the arena and returns its `Index`. Returns an error if a new chunk
    /// was needed and could not be reserved; the object is dropped in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0).unwrap();
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Result<Index> {
        if self.len == self.capacity {
            self.reserve_chunk()?;
        }
        self.len += 1;

        match self.head.take() {
            None => {
                let chunk_index = self.chunks.len() - 1;
                let chunk = &mut self.chunks[chunk_index];
                chunk.push(Block::Occupied(value));
                Ok(Index {
                    chunk_index,
                    block_index: chunk.len() - 1,
                })
            },
            Some(index) => {
                let block = mem::replace(
                    &mut self.chunks[index.chunk_index][index.block_index],
                    Block::Occupied(value),
                );
                match block {
                    Block::Vacant(next) => self.head = next,
                    Block::Occupied(_) => panic!("Expected the free list to hold a vacant block."),
                }
                Ok(index)
            },
        }
    }

    /// Deallocates an object and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not refer to an occupied block.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0).unwrap();
    /// assert_eq!(arena.free(&x), 0);
    /// ```
    pub fn free(&mut self, index: &Index) -> T {
        match self.block(index) {
            Some(Block::Occupied(_)) => {},
            Some(Block::Vacant(_)) => panic!("Error: attempting to free vacant block."),
            None => panic!("Error: attempting to free invalid block."),
        }
        let block = mem::replace(
            &mut self.chunks[index.chunk_index][index.block_index],
            Block::Vacant(self.head.take()),
        );
        self.head = Some(*index);
        self.len -= 1;
        match block {
            Block::Occupied(value) => value,
            Block::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to an object. Returns `None` if `index` does not refer to
    /// an occupied block.
    pub fn get(&self, index: &Index) -> Option<&T> {
        match self.block(index) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object. Returns `None` if `index` does not refer to an
    /// occupied block.
    pub fn get_mut(&mut self, index: &Index) -> Option<&mut T> {
        let block = self
            .chunks
            .get_mut(index.chunk_index)
            .and_then(|chunk| chunk.get_mut(index.block_index));
        match block {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every object and releases all chunks.
    pub fn clear(&mut self) {
        self.head = None;
        self.chunks.clear();
        self.len = 0;
        self.capacity = 0;
    }

    /// Returns an iterator over the indices of all live objects, in allocation-slot order.
    pub fn indices(&self) -> impl Iterator<Item = Index> + '_ {
        self.chunks.iter().enumerate().flat_map(|(chunk_index, chunk)| {
            chunk
                .iter()
                .enumerate()
                .filter(|(_, block)| matches!(block, Block::Occupied(_)))
                .map(move |(block_index, _)| Index {
                    chunk_index,
                    block_index,
                })
        })
    }
}

impl<T> IndexOp<Index> for TypedArena<T> {
    type Output = T;

    fn index(&self, index: Index) -> &Self::Output {
        self.get(&index).expect("Error: index does not refer to a live object.")
    }
}

impl<T> IndexMut<Index> for TypedArena<T> {
    fn index_mut(&mut self, index: Index) -> &mut Self::Output {
        self.get_mut(&index).expect("Error: index does not refer to a live object.")
    }
}
