//! # Chunk Deque
//!
//! A double-ended queue backed by a map of pooled, fixed-capacity chunks
//! instead of one contiguous ring buffer.
//!
//! Elements are stored in chunks of `C` slots (128 by default). An ordered,
//! resizable map of slots points at the chunks, so growing the deque at
//! either end only ever moves chunk *pointers*: elements are never copied
//! after they are written, and there is no per-element allocation. Chunks
//! that empty out are parked in a [`ChunkPool`] and recycled, so
//! steady-state push/pop churn does not touch the allocator at all.
//!
//! ## Key properties
//!
//! * **Amortized O(1)** `push_back` / `push_front` / `pop_back` /
//!   `pop_front`; map reallocation is geometric and only moves pointers.
//! * **Memory tracks the live count:** every pop runs a shrink check, so a
//!   deque that grew to millions of elements and drained back down releases
//!   its map slack instead of pinning peak memory.
//! * **Chunk recycling:** pools are cheap handles that can be shared
//!   between deques and across threads; the free list is internally
//!   synchronized. A single deque carries no synchronization of its own and
//!   belongs to one thread at a time.
//! * **Addressable positions:** [`Cursor`] values snapshot a `(chunk,
//!   slot)` address, step forward across chunk boundaries, and compare in a
//!   single chunk-major total order.
//!
//! ## Examples
//!
//! Basic use:
//!
//! ```rust
//! use chunk_deque::ChunkDeque;
//!
//! let mut deque: ChunkDeque<i32> = ChunkDeque::new();
//! deque.push_back(1);
//! deque.push_back(2);
//! deque.push_front(0);
//!
//! assert_eq!(deque.len(), 3);
//! assert_eq!(deque.pop_front(), Some(0));
//! assert_eq!(deque.pop_back(), Some(2));
//! assert_eq!(deque.pop_back(), Some(1));
//! assert_eq!(deque.pop_back(), None);
//! ```
//!
//! Walking the live range by cursor:
//!
//! ```rust
//! use chunk_deque::ChunkDeque;
//!
//! let deque: ChunkDeque<i32> = (0..5).collect();
//! let mut cur = deque.cursor_front();
//! let mut total = 0;
//! while cur <= deque.cursor_back() {
//!     total += deque.get(cur).copied().unwrap();
//!     cur = cur.next();
//! }
//! assert_eq!(total, 10);
//! ```
//!
//! Sharing one pool between deques, with small chunks and a small map so
//! the policy is easy to observe:
//!
//! ```rust
//! use chunk_deque::{ChunkDeque, ChunkPool, Tunables};
//!
//! let pool: ChunkPool<u64, 4> = ChunkPool::new();
//! let tunables = Tunables { initial_slots: 4, ..Tunables::default() };
//!
//! let mut a = ChunkDeque::with_pool_and_tunables(&pool, tunables);
//! for i in 0..32 {
//!     a.push_back(i);
//! }
//! drop(a); // parks a's chunks
//!
//! let mut b = ChunkDeque::with_pool_and_tunables(&pool, tunables);
//! b.push_back(1u64); // served from the free list
//! assert!(pool.reuses() > 0);
//! ```

mod cursor;
mod deque;
mod map;
mod pool;

pub use cursor::Cursor;
pub use deque::{ChunkDeque, Iter};
pub use map::Tunables;
pub use pool::ChunkPool;
