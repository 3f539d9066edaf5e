//! Fixed-capacity error history.
//!
//! A true ring: once full, each push evicts the oldest record. Indices are
//! relative to the current contents, so `get(0)` is always the oldest
//! surviving record and `get(len - 1)` the newest.
//!
//! ```text
//!   capacity = 4, pushed 1..=5
//!
//!   slots:  [ 5 | 2 | 3 | 4 ]
//!                 ▲
//!                head (oldest)     get(0) = 2, get(3) = 5
//! ```
//!
//! No allocation. Callers provide the locking.

use crate::record::ErrorRecord;

pub struct HistoryRing<const N: usize> {
    slots: [Option<ErrorRecord>; N],
    /// Slot of the oldest record.
    head: usize,
    len: usize,
}

impl<const N: usize> HistoryRing<N> {
    pub const CAPACITY: usize = N;

    pub const fn new() -> Self {
        HistoryRing {
            slots: [None; N],
            head: 0,
            len: 0,
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// Append a record. Returns the evicted record when the ring was full.
    ///
    /// A zero-capacity ring keeps nothing and hands the record straight back.
    pub fn push(&mut self, record: ErrorRecord) -> Option<ErrorRecord> {
        if N == 0 {
            return Some(record);
        }
        if self.len < N {
            let tail = (self.head + self.len) % N;
            self.slots[tail] = Some(record);
            self.len += 1;
            None
        } else {
            let evicted = self.slots[self.head].replace(record);
            self.head = (self.head + 1) % N;
            evicted
        }
    }

    /// The `index`-th oldest surviving record.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&ErrorRecord> {
        if index >= self.len {
            return None;
        }
        self.slots[(self.head + index) % N].as_ref()
    }

    #[inline]
    pub fn oldest(&self) -> Option<&ErrorRecord> {
        self.get(0)
    }

    #[inline]
    pub fn newest(&self) -> Option<&ErrorRecord> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Drop every record. Slots are not scrubbed; `len` gates access.
    #[inline]
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> Iter<'_, N> {
        Iter { ring: self, pos: 0 }
    }
}

impl<const N: usize> Default for HistoryRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Clone for HistoryRing<N> {
    fn clone(&self) -> Self {
        HistoryRing {
            slots: self.slots,
            head: self.head,
            len: self.len,
        }
    }
}

impl<const N: usize> core::fmt::Debug for HistoryRing<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct Iter<'a, const N: usize> {
    ring: &'a HistoryRing<N>,
    pos: usize,
}

impl<'a, const N: usize> Iterator for Iter<'a, N> {
    type Item = &'a ErrorRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.ring.get(self.pos)?;
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.ring.len().saturating_sub(self.pos);
        (left, Some(left))
    }
}

impl<'a, const N: usize> ExactSizeIterator for Iter<'a, N> {}

impl<'a, const N: usize> IntoIterator for &'a HistoryRing<N> {
    type Item = &'a ErrorRecord;
    type IntoIter = Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
