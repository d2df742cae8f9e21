use std::ptr::{self, NonNull};

use crate::error::PoolError;

/// Address of block `index` within the region starting at `base`.
///
/// All block addressing in the crate funnels through here so the
/// index-to-address mapping lives in one place.
#[inline]
pub(crate) unsafe fn block_at(base: *mut u8, block_size: usize, index: usize) -> *mut u8 {
  unsafe { base.add(index * block_size) }
}

/// Threads a byte region into a chain of `block_size` blocks.
///
/// The region holds `m = len / block_size` blocks (trailing remainder bytes
/// are unused). Block `i`'s first pointer-width bytes receive the address
/// of block `i - 1`; block 0's link field is zeroed and terminates the
/// chain. Returns the address of block `m - 1`, the initial top.
///
/// Pop order is therefore block `m - 1` down to block 0 — a contract, not
/// an accident; it keeps allocation sequences bit-reproducible for a given
/// region and block size.
///
/// Fails with `InsufficientCapacity` when fewer than 2 blocks fit. Nothing
/// is written in that case.
///
/// # Safety
///
/// `base` must be pointer-width aligned and valid for writes of `len`
/// bytes; `block_size` must be a multiple of the pointer width, at least
/// one pointer wide.
pub(crate) unsafe fn link_blocks(
  base: *mut u8,
  len: usize,
  block_size: usize,
) -> Result<NonNull<u8>, PoolError> {
  let blocks = len / block_size;

  if blocks < 2 {
    return Err(PoolError::InsufficientCapacity {
      capacity: len,
      block_size,
    });
  }

  unsafe {
    // Block 0 is the bottom of the stack.
    ptr::write(base.cast::<*mut u8>(), ptr::null_mut());

    for i in 1..blocks {
      let prev = block_at(base, block_size, i - 1);
      let block = block_at(base, block_size, i);
      block.cast::<*mut u8>().write(prev);
    }

    Ok(NonNull::new_unchecked(block_at(base, block_size, blocks - 1)))
  }
}
