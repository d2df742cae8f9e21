//! # nodepool - A Fixed-Capacity Node Allocator Library
//!
//! This crate provides a constant-time **node pool allocator** over a
//! caller-supplied, fixed-capacity byte region, meant as the backing
//! allocator of node-based containers (binary search trees, linked lists).
//!
//! ## Overview
//!
//! The buffer is split into fixed-size blocks and the free blocks are
//! threaded into an intrusive LIFO free list:
//!
//! ```text
//!   Arena Partitioning (block size S, m = len / S blocks):
//!
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                    CALLER-OWNED BUFFER                       │
//!   │                                                              │
//!   │   ┌─────────┬─────────┬─────────┬─────────┬───────────────┐  │
//!   │   │ block 0 │ block 1 │ block 2 │ block 3 │   remainder   │  │
//!   │   │  null   │  ●──0   │  ●──1   │  ●──2   │   (unused)    │  │
//!   │   └─────────┴─────────┴─────────┴─────────┴───────────────┘  │
//!   │        ▲                             ▲                       │
//!   │        │                             │                       │
//!   │     bottom                      top of stack                 │
//!   │    of stack                     (first pop)                  │
//!   │                                                              │
//!   │   Each free block's first pointer-width bytes hold the       │
//!   │   address of the block below it (●──i  = "points at          │
//!   │   block i"); block 0 terminates the chain with null.         │
//!   └──────────────────────────────────────────────────────────────┘
//!
//!   Allocation pops the top block, deallocation pushes it back.
//!   Both are O(1): just one link-field read or write.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   nodepool
//!   ├── align      - Block-size computation (align!, block_size_for)
//!   ├── arena      - NodeArena: lazy-binding handle over the buffer
//!   ├── error      - PoolError taxonomy
//!   ├── link       - One-shot block partitioner (internal)
//!   ├── node       - NodeAllocator and the NodeAlloc capability trait
//!   └── stack      - FreeStack: intrusive LIFO free list
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use nodepool::{NodeAlloc, NodeArena};
//!
//! // 64 bytes, pointer aligned because it is an array of u64.
//! let mut buf = [0u64; 8];
//! let arena = unsafe { NodeArena::from_raw_parts(buf.as_mut_ptr().cast(), 64) };
//!
//! // First bind partitions the buffer; 16-byte nodes => 4 blocks.
//! let alloc = arena.bind::<[u64; 2]>().unwrap();
//!
//! let node = alloc.allocate_node().unwrap();
//! unsafe {
//!     alloc.construct(node, [1, 2]);
//!     alloc.destroy(node);
//!     alloc.deallocate_node(node);
//! }
//! ```
//!
//! ## How It Works
//!
//! Binding is lazy and happens exactly once. Constructing a [`NodeArena`]
//! stores only the pointer and length of the buffer; the partitioning runs
//! the first time the arena is bound to a concrete element type, because
//! only then is the block size known:
//!
//! ```text
//!   Lifecycle:
//!
//!   caller buffer ──▶ NodeArena::from_raw_parts   (stores ptr + len)
//!                           │
//!                           │ arena.bind::<T>()   (first time: link blocks)
//!                           ▼
//!                     NodeAllocator<T> ──clone──▶ NodeAllocator<T>
//!                           │                           │
//!                           └───── same free list ──────┘
//!                                   (aliases)
//! ```
//!
//! Every allocator cloned or re-bound from the same arena draws from the
//! *same* free list — they are aliases, not independent pools, which is
//! what container copy and rebind semantics require. Two allocators
//! compare equal exactly when they alias the same pool.
//!
//! Element types narrower than a pointer cannot host the intrusive link
//! field. Binding such a type yields a passthrough allocator that serves
//! nodes from the global heap, one at a time, and never touches the arena.
//! The choice is made per element type at compile time.
//!
//! ## Failure Modes
//!
//! - [`PoolError::InsufficientCapacity`]: the buffer holds fewer than 2
//!   blocks at bind time. Nothing is linked.
//! - [`PoolError::Exhausted`]: the free list is empty at allocation time.
//!   The arena is never grown.
//! - [`PoolError::SizeMismatch`]: the arena was already linked with a
//!   different block size. The existing free list is left intact.
//!
//! ## Limitations
//!
//! - **Fixed-size blocks only**: one block size per arena, no growth,
//!   no compaction.
//! - **Single-threaded only**: no synchronization primitives; shared
//!   mutable free-list state is `Rc`-based.
//! - **Caller-enforced lifetimes**: the buffer must outlive every handle
//!   and allocator derived from it; this is not runtime checked.
//!
//! ## Safety
//!
//! The allocator hands out raw node storage and trusts the caller on
//! deallocation provenance, so the lifecycle operations are `unsafe`.
//! Passing a foreign pointer to `deallocate_node`, double-freeing, or
//! using an allocator after its buffer is gone corrupts the free list.

pub mod align;
mod arena;
mod error;
mod link;
mod node;
mod stack;

pub use arena::NodeArena;
pub use error::PoolError;
pub use node::{NodeAlloc, NodeAllocator};
pub use stack::FreeStack;
