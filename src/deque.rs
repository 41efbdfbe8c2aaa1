//! The deque facade over the chunk map, pool, and cursors.

use core::mem;
use std::fmt;
use std::iter::FusedIterator;

use crate::cursor::Cursor;
use crate::map::{ChunkMap, Tunables};
use crate::pool::ChunkPool;

/// A double-ended queue over a map of pooled, fixed-capacity chunks.
///
/// # Overview
///
/// Elements live in chunks of `C` slots. A resizable map of slots points at
/// the chunks; pushing past either edge of the map recenters or grows it by
/// moving chunk *pointers* only, so elements are never copied after they
/// are written. Chunks whose last live element is popped go back to a
/// [`ChunkPool`] and are handed out again later, so steady-state push/pop
/// churn allocates nothing.
///
/// Both `push_back`/`push_front` and `pop_back`/`pop_front` are amortized
/// O(1); the map stays proportional to the live element count because every
/// pop runs the shrink check.
///
/// # Cursors
///
/// [`cursor_front`](ChunkDeque::cursor_front) and
/// [`cursor_back`](ChunkDeque::cursor_back) return [`Cursor`] addresses of
/// the first and last element, inclusive. They support forward stepping and
/// total-order comparison; [`get`](ChunkDeque::get) resolves one, returning
/// `None` once it no longer falls inside the live range. On an empty deque
/// the front cursor compares greater than the back cursor.
///
/// # Generic parameters
///
/// | Parameter | Meaning |
/// |-----------|---------|
/// | `T` | Element type |
/// | `C` | Chunk capacity in elements; defaults to 128 |
///
/// A single instance is not synchronized; share the [`ChunkPool`] across
/// threads instead and keep each deque on one thread at a time.
pub struct ChunkDeque<T, const C: usize = 128> {
    map: ChunkMap<T, C>,
    pool: ChunkPool<T, C>,
    /// Address of the first live element; `end.next()` when empty.
    begin: Cursor<C>,
    /// Address of the last live element, inclusive.
    end: Cursor<C>,
}

impl<T, const C: usize> ChunkDeque<T, C> {
    /// Creates an empty deque with its own pool and default [`Tunables`].
    pub fn new() -> Self {
        Self::with_pool_and_tunables(&ChunkPool::new(), Tunables::default())
    }

    /// Creates an empty deque recycling chunks through `pool`.
    pub fn with_pool(pool: &ChunkPool<T, C>) -> Self {
        Self::with_pool_and_tunables(pool, Tunables::default())
    }

    /// Creates an empty deque with overridden policy parameters.
    ///
    /// # Panics
    ///
    /// Panics if the tunables are degenerate (see [`Tunables`]).
    pub fn with_tunables(tunables: Tunables) -> Self {
        Self::with_pool_and_tunables(&ChunkPool::new(), tunables)
    }

    /// Creates an empty deque with both a shared pool and overridden policy
    /// parameters.
    ///
    /// # Panics
    ///
    /// Panics if the tunables are degenerate (see [`Tunables`]).
    pub fn with_pool_and_tunables(pool: &ChunkPool<T, C>, tunables: Tunables) -> Self {
        const {
            assert!(C > 0, "chunk capacity C must be non-zero");
        }
        let map = ChunkMap::new(tunables);
        let (begin, end) = Self::centered_sentinels(map.slot_count());
        Self {
            map,
            pool: pool.clone(),
            begin,
            end,
        }
    }

    /// Empty-state cursors, centered so the first push in either direction
    /// lands mid-map: `begin` one step past `end`.
    fn centered_sentinels(slot_count: usize) -> (Cursor<C>, Cursor<C>) {
        let begin = Cursor::new((slot_count as isize + 1) / 2, 0);
        (begin, begin.prev())
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        let span =
            (self.end.chunk - self.begin.chunk) * C as isize + (self.end.slot - self.begin.slot)
                + 1;
        span.max(0) as usize
    }

    /// Returns `true` if the deque holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.begin
    }

    /// Current number of map slots. Grows and shrinks with the live chunk
    /// span; tests assert the shrink policy through this.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.map.slot_count()
    }

    /// Elements addressable without growing the map.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.map.slot_count() * C
    }

    /// Appends an element at the back.
    pub fn push_back(&mut self, value: T) {
        if self.end.chunk == self.map.last_chunk() && self.end.slot == C as isize - 1 {
            self.map.rebalance(&mut self.begin, &mut self.end);
        }
        self.end = self.end.next();
        self.map.write(self.end, value, &self.pool);
    }

    /// Prepends an element at the front.
    pub fn push_front(&mut self, value: T) {
        if self.begin.chunk == 0 && self.begin.slot == 0 {
            self.map.rebalance(&mut self.begin, &mut self.end);
        }
        self.begin = self.begin.prev();
        self.map.write(self.begin, value, &self.pool);
    }

    /// Removes and returns the back element, or `None` if empty.
    ///
    /// The map shrink check runs whether or not anything was popped.
    pub fn pop_back(&mut self) -> Option<T> {
        let popped = if self.begin <= self.end {
            // SAFETY: non-empty, so `end` addresses the last live element.
            let value = unsafe { self.map.take(self.end) };
            let retreated = self.end.prev();
            if retreated.chunk != self.end.chunk {
                self.map.release(self.end.chunk, &self.pool);
            }
            self.end = retreated;
            Some(value)
        } else {
            None
        };
        self.map.rebalance(&mut self.begin, &mut self.end);
        popped
    }

    /// Removes and returns the front element, or `None` if empty.
    ///
    /// The map shrink check runs whether or not anything was popped.
    pub fn pop_front(&mut self) -> Option<T> {
        let popped = if self.begin <= self.end {
            // SAFETY: non-empty, so `begin` addresses the first live element.
            let value = unsafe { self.map.take(self.begin) };
            let advanced = self.begin.next();
            if advanced.chunk != self.begin.chunk {
                self.map.release(self.begin.chunk, &self.pool);
            }
            self.begin = advanced;
            Some(value)
        } else {
            None
        };
        self.map.rebalance(&mut self.begin, &mut self.end);
        popped
    }

    /// Address of the first element. One step past
    /// [`cursor_back`](ChunkDeque::cursor_back) when the deque is empty.
    #[inline]
    pub fn cursor_front(&self) -> Cursor<C> {
        self.begin
    }

    /// Address of the last element (inclusive).
    #[inline]
    pub fn cursor_back(&self) -> Cursor<C> {
        self.end
    }

    /// Reads the element at `cursor`, or `None` if the address does not
    /// currently fall inside the live range.
    pub fn get(&self, cursor: Cursor<C>) -> Option<&T> {
        if self.begin <= cursor && cursor <= self.end {
            // SAFETY: the live range holds initialized elements only.
            Some(unsafe { self.map.get(cursor) })
        } else {
            None
        }
    }

    /// Mutable counterpart of [`get`](ChunkDeque::get).
    pub fn get_mut(&mut self, cursor: Cursor<C>) -> Option<&mut T> {
        if self.begin <= cursor && cursor <= self.end {
            // SAFETY: the live range holds initialized elements only.
            Some(unsafe { self.map.get_mut(cursor) })
        } else {
            None
        }
    }

    /// Returns a reference to the front element, or `None` if empty.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(self.begin)
    }

    /// Returns a reference to the back element, or `None` if empty.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.get(self.end)
    }

    /// Returns a mutable reference to the front element, or `None` if empty.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.begin)
    }

    /// Returns a mutable reference to the back element, or `None` if empty.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.end)
    }

    /// Drops every element, parks every chunk in the pool, and resets the
    /// map and cursors to the freshly-constructed state.
    pub fn clear(&mut self) {
        self.drop_live();
        self.map.reset(&self.pool);
        let (begin, end) = Self::centered_sentinels(self.map.slot_count());
        self.begin = begin;
        self.end = end;
    }

    /// Forward iterator over the live range.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter {
            deque: self,
            cursor: self.begin,
        }
    }

    fn drop_live(&mut self) {
        if !mem::needs_drop::<T>() {
            return;
        }
        let mut cur = self.begin;
        while cur <= self.end {
            // SAFETY: walking the live range front to back; each element is
            // taken exactly once.
            drop(unsafe { self.map.take(cur) });
            cur = cur.next();
        }
    }
}

impl<T, const C: usize> Drop for ChunkDeque<T, C> {
    fn drop(&mut self) {
        self.drop_live();
        self.map.release_all(&self.pool);
    }
}

impl<T, const C: usize> Default for ChunkDeque<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, const C: usize> fmt::Debug for ChunkDeque<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone, const C: usize> Clone for ChunkDeque<T, C> {
    fn clone(&self) -> Self {
        let mut cloned = Self::with_pool_and_tunables(&self.pool, self.map.tunables());
        cloned.extend(self.iter().cloned());
        cloned
    }
}

impl<T: PartialEq, const C: usize> PartialEq for ChunkDeque<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const C: usize> Eq for ChunkDeque<T, C> {}

impl<T, const C: usize> Extend<T> for ChunkDeque<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T, const C: usize> FromIterator<T> for ChunkDeque<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::new();
        deque.extend(iter);
        deque
    }
}

/// Forward iterator returned by [`ChunkDeque::iter`].
pub struct Iter<'a, T, const C: usize> {
    deque: &'a ChunkDeque<T, C>,
    cursor: Cursor<C>,
}

impl<'a, T, const C: usize> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let deque = self.deque;
        let item = deque.get(self.cursor)?;
        self.cursor = self.cursor.next();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let span = (self.deque.end.chunk - self.cursor.chunk) * C as isize
            + (self.deque.end.slot - self.cursor.slot)
            + 1;
        let remaining = span.max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl<T, const C: usize> ExactSizeIterator for Iter<'_, T, C> {}

impl<T, const C: usize> FusedIterator for Iter<'_, T, C> {}

impl<'a, T, const C: usize> IntoIterator for &'a ChunkDeque<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Iter<'a, T, C> {
        self.iter()
    }
}
