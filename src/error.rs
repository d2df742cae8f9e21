use std::error::Error;
use std::fmt;

/// Errors reported by the pool.
///
/// Everything here is detected at the point of violation and returned to the
/// immediate caller; the pool never retries or recovers internally.
/// Misaligned buffers, foreign pointers and use-after-arena-destruction are
/// caller contracts, not reported errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolError {
  /// The arena cannot hold the minimum of 2 blocks at the requested block
  /// size. Detected once, at bind time; no partial linking is left behind.
  InsufficientCapacity {
    /// Arena length in bytes.
    capacity: usize,
    /// Block size the bind asked for.
    block_size: usize,
  },
  /// The free list is empty. Equivalent to out-of-memory; the arena is
  /// never grown to satisfy the request.
  Exhausted,
  /// The arena was already linked with a different block size. The existing
  /// free list is left untouched.
  SizeMismatch {
    /// Block size the arena was linked with.
    linked: usize,
    /// Block size the rejected bind asked for.
    requested: usize,
  },
}

impl fmt::Display for PoolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InsufficientCapacity {
        capacity,
        block_size,
      } => {
        write!(
          f,
          "arena of {capacity} bytes holds fewer than 2 blocks of {block_size} bytes"
        )
      }
      Self::Exhausted => {
        write!(f, "free list exhausted")
      }
      Self::SizeMismatch { linked, requested } => {
        write!(
          f,
          "arena already linked with {linked}-byte blocks, bind requested {requested} bytes"
        )
      }
    }
  }
}

impl Error for PoolError {}
