use std::cell::RefCell;
use std::rc::Rc;

use crate::align::{block_size_for, fits_pool};
use crate::error::PoolError;
use crate::link::link_blocks;
use crate::node::NodeAllocator;
use crate::stack::FreeStack;

/// Free list adopted at first bind, remembered so later binds alias it
/// instead of re-linking.
struct Bound {
  block_size: usize,
  stack: FreeStack,
}

struct ArenaInner {
  base: *mut u8,
  len: usize,
  bound: RefCell<Option<Bound>>,
}

/// Handle over a caller-owned byte region used as node storage.
///
/// Construction is lazy: only the pointer and length are stored. The region
/// is partitioned into blocks and threaded into a free list exactly once,
/// the first time the arena is bound to a concrete element type — that is
/// when the block size becomes known. Every later bind and every clone
/// aliases the same free list; the arena never duplicates the pool.
///
/// The arena never owns the region. The caller keeps the buffer alive for
/// as long as any handle or allocator derived from it exists.
#[derive(Clone)]
pub struct NodeArena {
  inner: Rc<ArenaInner>,
}

impl NodeArena {
  /// Wraps a raw byte region. Stores pointer and length only; no linking
  /// happens until [`NodeArena::bind`].
  ///
  /// # Safety
  ///
  /// `base` must be pointer-width aligned and valid for reads and writes of
  /// `len` bytes for the lifetime of every handle and allocator derived
  /// from this arena. The region must not be accessed through other
  /// pointers while the arena is in use.
  pub unsafe fn from_raw_parts(base: *mut u8, len: usize) -> Self {
    Self {
      inner: Rc::new(ArenaInner {
        base,
        len,
        bound: RefCell::new(None),
      }),
    }
  }

  /// Length of the backing region in bytes.
  pub fn capacity(&self) -> usize {
    self.inner.len
  }

  /// True once a bind has linked the region into a free list.
  pub fn is_bound(&self) -> bool {
    self.inner.bound.borrow().is_some()
  }

  /// Block size the region was linked with, if it has been linked.
  pub fn block_size(&self) -> Option<usize> {
    self.inner.bound.borrow().as_ref().map(|b| b.block_size)
  }

  /// Produces an allocator for nodes of type `T`.
  ///
  /// Element types too small to host a link field get the heap passthrough
  /// allocator and leave the region untouched. Otherwise, the first bind
  /// partitions and links the region (failing with `InsufficientCapacity`
  /// if fewer than 2 blocks fit); subsequent binds with the same block
  /// size alias the existing free list, and binds with a different block
  /// size are rejected with `SizeMismatch` rather than re-linked over live
  /// state.
  pub fn bind<T>(&self) -> Result<NodeAllocator<T>, PoolError> {
    if !fits_pool::<T>() {
      return Ok(NodeAllocator::passthrough());
    }

    let block_size = block_size_for::<T>();
    let mut bound = self.inner.bound.borrow_mut();

    if let Some(b) = bound.as_ref() {
      if b.block_size == block_size {
        return Ok(NodeAllocator::pooled(b.stack.clone()));
      }
      return Err(PoolError::SizeMismatch {
        linked: b.block_size,
        requested: block_size,
      });
    }

    let stack = unsafe {
      let top = link_blocks(self.inner.base, self.inner.len, block_size)?;
      FreeStack::from_top(top.as_ptr())
    };
    let allocator = NodeAllocator::pooled(stack.clone());

    *bound = Some(Bound { block_size, stack });
    Ok(allocator)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::node::NodeAlloc;
  use std::mem;

  type Node = [u64; 2]; // 16 bytes, pool backed.

  fn arena_over(buf: &mut [u64]) -> NodeArena {
    let len = buf.len() * mem::size_of::<u64>();
    unsafe { NodeArena::from_raw_parts(buf.as_mut_ptr().cast(), len) }
  }

  #[test]
  fn test_construction_is_lazy() {
    let pattern = 0x5555_5555_5555_5555u64;
    let mut buf = [pattern; 8];
    let arena = arena_over(&mut buf);

    assert_eq!(arena.capacity(), 64);
    assert!(!arena.is_bound());
    assert_eq!(arena.block_size(), None);

    // No linking happened, so the buffer is untouched.
    assert!(buf.iter().all(|&w| w == pattern));
  }

  #[test]
  fn test_bind_links_once() {
    let mut buf = [0u64; 8];
    let arena = arena_over(&mut buf);

    let alloc = arena.bind::<Node>().unwrap();
    assert!(arena.is_bound());
    assert_eq!(arena.block_size(), Some(16));

    // A second bind must alias the same pool, not rebuild it: a block
    // taken through the first allocator stays unavailable through the
    // second.
    let taken = alloc.allocate_node().unwrap();
    let alias = arena.bind::<Node>().unwrap();
    assert_eq!(alloc, alias);

    let mut seen = Vec::new();
    while let Ok(block) = alias.allocate_node() {
      seen.push(block);
    }
    assert_eq!(seen.len(), 3);
    assert!(!seen.contains(&taken));
  }

  #[test]
  fn test_bind_different_size_rejected() {
    let mut buf = [0u64; 8];
    let arena = arena_over(&mut buf);

    arena.bind::<Node>().unwrap();
    let err = arena.bind::<[u64; 4]>().unwrap_err();

    assert_eq!(
      err,
      PoolError::SizeMismatch {
        linked: 16,
        requested: 32,
      }
    );

    // The original free list is still intact.
    assert_eq!(arena.block_size(), Some(16));
    let alloc = arena.bind::<Node>().unwrap();
    assert!(alloc.allocate_node().is_ok());
  }

  #[test]
  fn test_bind_same_block_size_different_type() {
    let mut buf = [0u64; 8];
    let arena = arena_over(&mut buf);

    // u64 and usize both bind at pointer-width blocks and share the pool.
    let a = arena.bind::<u64>().unwrap();
    let b = arena.bind::<usize>().unwrap();

    let node = a.allocate_node().unwrap();
    unsafe { b.deallocate_node(node.cast()) };
    assert_eq!(a.allocate_node(), Ok(node));
  }

  #[test]
  fn test_insufficient_capacity() {
    let pattern = 0xDEAD_BEEF_DEAD_BEEFu64;
    let mut buf = [pattern; 3]; // 24 bytes, one 16-byte block.
    let arena = arena_over(&mut buf);

    let err = arena.bind::<Node>().unwrap_err();
    assert_eq!(
      err,
      PoolError::InsufficientCapacity {
        capacity: 24,
        block_size: 16,
      }
    );

    // Nothing was linked and the arena stays unbound.
    assert!(!arena.is_bound());
    assert!(buf.iter().all(|&w| w == pattern));
  }

  #[test]
  fn test_small_elements_leave_arena_untouched() {
    let pattern = 0x1111_1111_1111_1111u64;
    let mut buf = [pattern; 8];
    let arena = arena_over(&mut buf);

    let alloc = arena.bind::<u8>().unwrap();
    assert!(!arena.is_bound());

    let node = alloc.allocate_node().unwrap();
    unsafe {
      alloc.construct(node, 42u8);
      assert_eq!(node.as_ptr().read(), 42);
      alloc.deallocate_node(node);
    }

    assert!(buf.iter().all(|&w| w == pattern));
  }

  #[test]
  fn test_cloned_handles_share_state() {
    let mut buf = [0u64; 8];
    let arena = arena_over(&mut buf);
    let handle = arena.clone();

    arena.bind::<Node>().unwrap();
    assert!(handle.is_bound());
    assert_eq!(handle.block_size(), Some(16));
  }
}
