//! The chunk map: a resizable sequence of slots, each empty or owning one
//! chunk, plus the policy that recenters, grows, and shrinks it.

use crate::cursor::Cursor;
use crate::pool::{ChunkBuf, ChunkPool};

/// Named parameters of the map growth/shrink policy.
///
/// The defaults reproduce the reference behavior: an 8-slot map that
/// doubles until it reaches 1024 slots, grows by 25% increments past that,
/// and shrinks once the occupied chunk span drops below half the slot
/// count. Override individual fields with struct update syntax:
///
/// ```
/// use chunk_deque::Tunables;
///
/// let small = Tunables {
///     initial_slots: 2,
///     ..Tunables::default()
/// };
/// assert_eq!(small.doubling_limit, 1024);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tunables {
    /// Slot count of a fresh map. Must be at least 2.
    pub initial_slots: usize,
    /// Below this slot count the map doubles when saturated; at or above
    /// it, growth switches to `slots / growth_divisor` increments.
    pub doubling_limit: usize,
    /// Divisor for the post-limit growth increment (4 means +25%). The
    /// increment must add at least one slot of slack to each side, so
    /// `doubling_limit >= 2 * growth_divisor` is required.
    pub growth_divisor: usize,
    /// The map shrinks when the occupied chunk span is smaller than
    /// `slots / shrink_divisor` (2 means below 50% occupancy).
    pub shrink_divisor: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            initial_slots: 8,
            doubling_limit: 1024,
            growth_divisor: 4,
            shrink_divisor: 2,
        }
    }
}

impl Tunables {
    pub(crate) fn assert_valid(&self) {
        assert!(self.initial_slots >= 2, "initial_slots must be at least 2");
        assert!(self.shrink_divisor >= 1, "shrink_divisor must be non-zero");
        assert!(self.growth_divisor >= 1, "growth_divisor must be non-zero");
        // Guarantees every growth step adds slack on both sides of the map.
        assert!(
            self.doubling_limit >= 2 * self.growth_divisor,
            "doubling_limit must be at least 2 * growth_divisor"
        );
    }
}

/// Slot sequence and policy state.
///
/// # Invariants
///
/// * Every owned slot lies within `[begin.chunk, end.chunk]` of the deque's
///   cursors; slots outside that span are `None`. The span may be empty
///   (`begin == end.next()`), in which case at most the shared
///   `begin.chunk == end.chunk` slot is owned.
/// * Rebalancing moves chunk ownership between slots but never touches
///   element slots: the `slot` component of a cursor survives every case.
pub(crate) struct ChunkMap<T, const C: usize> {
    slots: Vec<Option<ChunkBuf<T, C>>>,
    tunables: Tunables,
}

impl<T, const C: usize> ChunkMap<T, C> {
    pub(crate) fn new(tunables: Tunables) -> Self {
        tunables.assert_valid();
        let mut slots = Vec::with_capacity(tunables.initial_slots);
        slots.resize_with(tunables.initial_slots, || None);
        Self { slots, tunables }
    }

    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn last_chunk(&self) -> isize {
        self.slots.len() as isize - 1
    }

    #[inline]
    pub(crate) fn tunables(&self) -> Tunables {
        self.tunables
    }

    /// Writes `value` at `cur`, acquiring a chunk for the slot first if it
    /// is empty. Overwriting a stale slot is fine: element slots are
    /// `MaybeUninit` and carry no drop glue.
    pub(crate) fn write(&mut self, cur: Cursor<C>, value: T, pool: &ChunkPool<T, C>) {
        let chunk = self.slots[cur.chunk as usize].get_or_insert_with(|| pool.acquire());
        chunk[cur.slot as usize] = core::mem::MaybeUninit::new(value);
    }

    /// Moves the element at `cur` out of its slot.
    ///
    /// # Safety
    ///
    /// `cur` must address a live element: its slot owns a chunk and the
    /// element slot was written and not yet taken.
    pub(crate) unsafe fn take(&mut self, cur: Cursor<C>) -> T {
        debug_assert!(self.slots[cur.chunk as usize].is_some());
        // SAFETY: guaranteed by the caller.
        unsafe {
            let chunk = self.slots[cur.chunk as usize].as_ref().unwrap_unchecked();
            chunk[cur.slot as usize].assume_init_read()
        }
    }

    /// # Safety
    ///
    /// Same contract as [`take`](ChunkMap::take), without consuming the
    /// element.
    pub(crate) unsafe fn get(&self, cur: Cursor<C>) -> &T {
        debug_assert!(self.slots[cur.chunk as usize].is_some());
        // SAFETY: guaranteed by the caller.
        unsafe {
            let chunk = self.slots[cur.chunk as usize].as_ref().unwrap_unchecked();
            chunk[cur.slot as usize].assume_init_ref()
        }
    }

    /// # Safety
    ///
    /// Same contract as [`get`](ChunkMap::get).
    pub(crate) unsafe fn get_mut(&mut self, cur: Cursor<C>) -> &mut T {
        debug_assert!(self.slots[cur.chunk as usize].is_some());
        // SAFETY: guaranteed by the caller.
        unsafe {
            let chunk = self.slots[cur.chunk as usize].as_mut().unwrap_unchecked();
            chunk[cur.slot as usize].assume_init_mut()
        }
    }

    /// Empties the slot at `chunk`, parking its buffer in the pool.
    pub(crate) fn release(&mut self, chunk: isize, pool: &ChunkPool<T, C>) {
        if let Some(buf) = self.slots[chunk as usize].take() {
            pool.release(buf);
        }
    }

    /// Parks every owned chunk and leaves the slot sequence empty.
    pub(crate) fn release_all(&mut self, pool: &ChunkPool<T, C>) {
        for buf in self.slots.drain(..).flatten() {
            pool.release(buf);
        }
    }

    /// [`release_all`](ChunkMap::release_all), then restore the initial
    /// slot count.
    pub(crate) fn reset(&mut self, pool: &ChunkPool<T, C>) {
        self.release_all(pool);
        self.slots.resize_with(self.tunables.initial_slots, || None);
    }

    /// Recenters, grows, or shrinks the slot sequence.
    ///
    /// Invoked when a push finds its end of the map saturated, and after
    /// every pop whether or not it returned an element. Exactly one case
    /// applies, tested in order; otherwise the map is left alone. Chunk
    /// ownership moves between slots; chunk contents and the cursors' slot
    /// components are untouched.
    ///
    /// The occupied span is `end.chunk - begin.chunk`, which is `-1` when
    /// the deque emptied out across a chunk boundary (including the
    /// transient `end.chunk == -1` state left by a pop that retreated past
    /// slot `(0, 0)`); the signed arithmetic below is deliberate, and case
    /// 2 is what renormalizes that transient.
    pub(crate) fn rebalance(&mut self, begin: &mut Cursor<C>, end: &mut Cursor<C>) {
        let m = self.slots.len() as isize;
        let bc = begin.chunk;
        let ec = end.chunk;

        if ec == m - 1 && bc >= 1 {
            // End saturated, slack at the front: slide the owned span left.
            let offset = (bc + 1) / 2;
            for i in bc..=ec {
                self.slots[(i - offset) as usize] = self.slots[i as usize].take();
            }
            begin.chunk -= offset;
            end.chunk -= offset;
        } else if bc == 0 && ec <= m - 2 {
            // Begin saturated, slack at the back: slide right.
            let offset = (m - ec) / 2;
            for i in (bc..=ec).rev() {
                self.slots[(i + offset) as usize] = self.slots[i as usize].take();
            }
            begin.chunk += offset;
            end.chunk += offset;
        } else if bc == 0 && ec == m - 1 {
            // Saturated at both ends: grow and recenter, splitting the new
            // slack front = diff/2, back = diff - front.
            let old_len = m as usize;
            let new_len = if old_len < self.tunables.doubling_limit {
                2 * old_len
            } else {
                old_len + old_len / self.tunables.growth_divisor
            };
            let front = (new_len - old_len) / 2;
            let mut slots = Vec::with_capacity(new_len);
            slots.resize_with(new_len, || None);
            for (i, slot) in self.slots.drain(..).enumerate() {
                slots[front + i] = slot;
            }
            self.slots = slots;
            begin.chunk += front as isize;
            end.chunk += front as isize;
        } else if ec - bc < m / self.tunables.shrink_divisor as isize
            && m as usize > self.tunables.initial_slots
        {
            // Underutilized: reallocate to the occupied span plus one slack
            // slot on each side.
            let new_len = (ec - bc + 3) as usize;
            let mut slots = Vec::with_capacity(new_len);
            slots.resize_with(new_len, || None);
            for (i, j) in (bc..=ec).zip(1..) {
                slots[j] = self.slots[i as usize].take();
            }
            self.slots = slots;
            begin.chunk = 1;
            end.chunk = ec - bc + 1;
        }
    }
}
