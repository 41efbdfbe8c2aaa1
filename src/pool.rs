//! Recycling pool for chunk buffers.
//!
//! Every chunk a deque ever frees is parked here instead of being handed
//! back to the allocator, and later acquisitions are served from the parked
//! set first. A pool handle is cheap to clone and may be shared between
//! deques and across threads; the free list is guarded by a mutex.

use core::mem::MaybeUninit;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A chunk buffer: `C` element slots, individually initialized or not.
///
/// Buffers coming out of the pool are **not** cleared. The deque's
/// live-range discipline guarantees that a slot is always written before it
/// is read, and elements are moved out on pop, so a parked buffer never
/// holds a live value, only stale bytes that are neither read nor dropped.
pub(crate) type ChunkBuf<T, const C: usize> = Box<[MaybeUninit<T>; C]>;

/// A shared free list of fixed-capacity chunk buffers.
///
/// Each [`ChunkDeque`](crate::ChunkDeque) owns a pool; passing a clone of
/// one pool to several deques (see
/// [`ChunkDeque::with_pool`](crate::ChunkDeque::with_pool)) makes them
/// recycle each other's chunks. Cloning a pool clones the *handle*: both
/// handles drain and fill the same free list.
///
/// The counters ([`allocations`](ChunkPool::allocations),
/// [`reuses`](ChunkPool::reuses), [`idle`](ChunkPool::idle)) exist so tests
/// can measure allocation behavior on an isolated instance.
///
/// # Panics
///
/// All methods panic if another user of the same pool panicked while
/// holding the internal lock.
pub struct ChunkPool<T, const C: usize = 128> {
    shared: Arc<Mutex<PoolInner<T, C>>>,
}

struct PoolInner<T, const C: usize> {
    idle: Vec<ChunkBuf<T, C>>,
    allocations: usize,
    reuses: usize,
}

impl<T, const C: usize> ChunkPool<T, C> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(PoolInner {
                idle: Vec::new(),
                allocations: 0,
                reuses: 0,
            })),
        }
    }

    /// Hands out a chunk buffer, recycled if one is parked, freshly
    /// allocated otherwise. Contents are unspecified either way.
    pub(crate) fn acquire(&self) -> ChunkBuf<T, C> {
        let recycled = {
            let mut inner = self.shared.lock().unwrap();
            match inner.idle.pop() {
                Some(buf) => {
                    inner.reuses += 1;
                    Some(buf)
                }
                None => {
                    inner.allocations += 1;
                    None
                }
            }
        };
        // SAFETY: an array of `MaybeUninit` requires no initialization.
        recycled
            .unwrap_or_else(|| Box::new(unsafe { MaybeUninit::<[MaybeUninit<T>; C]>::uninit().assume_init() }))
    }

    /// Parks a buffer for future `acquire` calls. The buffer must not hold
    /// any live element; taking it by value makes further use impossible
    /// for the caller.
    pub(crate) fn release(&self, buf: ChunkBuf<T, C>) {
        self.shared.lock().unwrap().idle.push(buf);
    }

    /// Number of buffers ever created by this pool (acquisitions that could
    /// not be served from the free list).
    pub fn allocations(&self) -> usize {
        self.shared.lock().unwrap().allocations
    }

    /// Number of acquisitions served from the free list.
    pub fn reuses(&self) -> usize {
        self.shared.lock().unwrap().reuses
    }

    /// Number of buffers currently parked.
    pub fn idle(&self) -> usize {
        self.shared.lock().unwrap().idle.len()
    }
}

impl<T, const C: usize> Clone for ChunkPool<T, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, const C: usize> Default for ChunkPool<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const C: usize> fmt::Debug for ChunkPool<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.lock().unwrap();
        f.debug_struct("ChunkPool")
            .field("capacity", &C)
            .field("allocations", &inner.allocations)
            .field("reuses", &inner.reuses)
            .field("idle", &inner.idle.len())
            .finish()
    }
}
