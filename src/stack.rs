use std::cell::Cell;
use std::ptr::NonNull;
use std::rc::Rc;

/// LIFO stack threaded through the free blocks of an arena.
///
/// The stack owns no storage of its own: each free block's first
/// pointer-width bytes hold the address of the block below it, and the
/// stack keeps only the address of the top block. The top lives behind
/// `Rc<Cell<..>>`, so every clone drains and refills the same pool — a pop
/// through one handle is immediately visible through all the others.
///
/// Single-threaded by design; callers needing cross-thread use must
/// serialize externally.
#[derive(Clone, Debug)]
pub struct FreeStack {
  top: Rc<Cell<*mut u8>>,
}

impl FreeStack {
  /// Wraps an already-linked chain whose top block is `top`.
  ///
  /// # Safety
  ///
  /// `top` must be null or point at the top block of a chain produced by
  /// the block partitioner: each block's first pointer-width bytes hold
  /// the address of the block below it, terminated by null.
  pub unsafe fn from_top(top: *mut u8) -> Self {
    Self {
      top: Rc::new(Cell::new(top)),
    }
  }

  /// True when no block is left to pop.
  pub fn is_empty(&self) -> bool {
    self.top.get().is_null()
  }

  /// Pops the most recently pushed block, or `None` when the pool is dry.
  pub fn pop(&self) -> Option<NonNull<u8>> {
    let block = NonNull::new(self.top.get())?;

    // The popped block's link field holds the next block down (or null).
    let next = unsafe { block.as_ptr().cast::<*mut u8>().read() };
    self.top.set(next);

    Some(block)
  }

  /// Pushes `block` back on top of the stack.
  ///
  /// # Safety
  ///
  /// `block` must point at the start of a block previously popped from a
  /// stack aliasing this one, must not already be on the stack, and must
  /// have at least pointer-width writable bytes.
  pub unsafe fn push(&self, block: NonNull<u8>) {
    unsafe { block.as_ptr().cast::<*mut u8>().write(self.top.get()) };
    self.top.set(block.as_ptr());
  }

  /// Exchanges the tops of two stacks, transferring each one's remaining
  /// pool to the other without re-linking.
  pub fn swap(&self, other: &FreeStack) {
    self.top.swap(&other.top);
  }
}

/// Two stacks are equal iff they are the same logical stack — identity of
/// the shared state, not value equality of the tops. Containers use this to
/// decide whether one allocator may release blocks obtained from another.
impl PartialEq for FreeStack {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.top, &other.top)
  }
}

impl Eq for FreeStack {}
