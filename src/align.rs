use std::mem;

/// Rounds the given size up to the next multiple of the machine word.
///
/// # Examples
///
/// ```rust
/// use nodepool::align;
///
/// match std::mem::size_of::<usize>() {
///     8 => assert_eq!(align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + std::mem::size_of::<usize>() - 1) & !(std::mem::size_of::<usize>() - 1)
  };
}

/// Whether `T` is large enough to host the intrusive link of a free block.
///
/// Decided per element type at compile time: types that pass get the
/// pool-backed allocator, types that fail get the heap passthrough.
pub const fn fits_pool<T>() -> bool {
  mem::size_of::<T>() >= mem::size_of::<*mut u8>()
}

/// Block size used when an arena is bound to element type `T`.
///
/// At least a pointer wide (the link field must fit) and rounded up to a
/// multiple of `T`'s alignment, so that every block boundary keeps both the
/// link field and the node itself aligned.
pub const fn block_size_for<T>() -> usize {
  let ptr_size = mem::size_of::<*mut u8>();

  let size = if mem::size_of::<T>() > ptr_size {
    mem::size_of::<T>()
  } else {
    ptr_size
  };

  let align = if mem::align_of::<T>() > ptr_size {
    mem::align_of::<T>()
  } else {
    ptr_size
  };

  (size + align - 1) & !(align - 1)
}
