use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use crate::error::PoolError;
use crate::stack::FreeStack;

/// Allocation capability a node-based container asks of its allocator.
///
/// The container requests these four lifecycle operations directly from the
/// allocator type; there is no ambient customization point. The
/// `PartialEq` bound is part of the contract: nodes obtained through one
/// allocator may be released through another iff the two compare equal.
pub trait NodeAlloc<T>: PartialEq {
  /// Hands out storage for one node. Fails with `Exhausted` when no block
  /// is available; the backing region is never grown.
  fn allocate_node(&self) -> Result<NonNull<T>, PoolError>;

  /// Returns a node's storage to the allocator.
  ///
  /// # Safety
  ///
  /// `node` must have come from `allocate_node` on an allocator equal to
  /// this one, must not have been deallocated since, and must not hold a
  /// live value.
  unsafe fn deallocate_node(&self, node: NonNull<T>);

  /// Writes `value` into allocated but vacant storage.
  ///
  /// # Safety
  ///
  /// `node` must be allocated through this allocator and not currently
  /// hold a live value.
  unsafe fn construct(&self, node: NonNull<T>, value: T);

  /// Drops the value in place. The storage stays allocated.
  ///
  /// # Safety
  ///
  /// `node` must hold a live value written by `construct`.
  unsafe fn destroy(&self, node: NonNull<T>);
}

/// Where a `NodeAllocator` gets its blocks. The variant is a function of
/// `size_of::<T>()` alone, fixed when the allocator is created: for a given
/// element type every instance carries the same variant, so the dispatch
/// below never changes direction at runtime.
#[derive(Clone)]
enum Backing {
  /// Fixed-size blocks popped from an arena's free list.
  Pool(FreeStack),
  /// Element too small to host a link field; plain heap allocation, one
  /// node at a time. No pooling, no arena.
  Passthrough,
}

/// Container-facing allocator for fixed-size nodes of type `T`.
///
/// Obtained from [`NodeArena::bind`](crate::NodeArena::bind). Clones alias
/// the originating pool rather than duplicating it, which is what container
/// copy and rebind semantics require: an allocation made through one clone
/// is unavailable through all the others.
pub struct NodeAllocator<T> {
  backing: Backing,
  _marker: PhantomData<*mut T>,
}

impl<T> NodeAllocator<T> {
  /// Whether nodes of type `T` are served from an arena pool. Types
  /// narrower than a pointer cannot hold the intrusive link and fall back
  /// to the heap passthrough.
  pub const POOLED: bool = mem::size_of::<T>() >= mem::size_of::<*mut u8>();

  pub(crate) fn pooled(stack: FreeStack) -> Self {
    debug_assert!(Self::POOLED);
    Self {
      backing: Backing::Pool(stack),
      _marker: PhantomData,
    }
  }

  pub(crate) fn passthrough() -> Self {
    debug_assert!(!Self::POOLED);
    Self {
      backing: Backing::Passthrough,
      _marker: PhantomData,
    }
  }

  /// True when this allocator draws from an arena pool.
  pub fn is_pooled(&self) -> bool {
    matches!(self.backing, Backing::Pool(_))
  }

  /// Exchanges the pools of two allocators. Blocks already handed out stay
  /// valid; each allocator simply continues from the other's free list.
  pub fn swap(&mut self, other: &mut Self) {
    mem::swap(&mut self.backing, &mut other.backing);
  }
}

impl<T> Clone for NodeAllocator<T> {
  fn clone(&self) -> Self {
    Self {
      backing: self.backing.clone(),
      _marker: PhantomData,
    }
  }
}

impl<T> fmt::Debug for NodeAllocator<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NodeAllocator")
      .field("pooled", &self.is_pooled())
      .finish()
  }
}

impl<T> NodeAlloc<T> for NodeAllocator<T> {
  fn allocate_node(&self) -> Result<NonNull<T>, PoolError> {
    match &self.backing {
      Backing::Pool(stack) => stack
        .pop()
        .map(|block| block.cast::<T>())
        .ok_or(PoolError::Exhausted),
      Backing::Passthrough => {
        let layout = Layout::new::<T>();
        if layout.size() == 0 {
          return Ok(NonNull::dangling());
        }

        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or(PoolError::Exhausted)
      }
    }
  }

  unsafe fn deallocate_node(&self, node: NonNull<T>) {
    match &self.backing {
      Backing::Pool(stack) => unsafe { stack.push(node.cast::<u8>()) },
      Backing::Passthrough => {
        let layout = Layout::new::<T>();
        if layout.size() != 0 {
          unsafe { alloc::dealloc(node.as_ptr().cast::<u8>(), layout) };
        }
      }
    }
  }

  unsafe fn construct(&self, node: NonNull<T>, value: T) {
    unsafe { node.as_ptr().write(value) };
  }

  unsafe fn destroy(&self, node: NonNull<T>) {
    unsafe { ptr::drop_in_place(node.as_ptr()) };
  }
}

/// Two allocators are equal iff their free lists alias the same state.
/// Passthrough allocators all draw from the global heap and compare equal.
impl<T> PartialEq for NodeAllocator<T> {
  fn eq(&self, other: &Self) -> bool {
    match (&self.backing, &other.backing) {
      (Backing::Pool(a), Backing::Pool(b)) => a == b,
      (Backing::Passthrough, Backing::Passthrough) => true,
      _ => false,
    }
  }
}

impl<T> Eq for NodeAllocator<T> {}
