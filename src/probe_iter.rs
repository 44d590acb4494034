//! Cursors and iterators over `ProbeMap`'s slot table.
//!
//! Slot order is the only order a probing table has, so every traversal
//! here walks slot indices and skips anything that is not `Occupied`.
//! `TableCursor` is the detachable form: it holds a slot index and no
//! borrow of the map, so a mutating operation such as `remove_at` can
//! take the map and the cursor at once. Every cursor read re-checks the
//! slot, so a cursor left behind by a mutation degrades to misses and
//! no-ops rather than dangling.

use crate::probe_map::{Bucket, ProbeMap, Slot};
use crate::tree_iter::Direction;
use core::hash::{BuildHasher, Hash};

/// Bidirectional position in a `ProbeMap`, detached from the map borrow.
///
/// `None` is the end position for the cursor's own direction: one past
/// the last occupied slot for a forward cursor, one before the first for
/// a reverse cursor. `retreat` from the end re-enters the table at the
/// boundary slot, so a cursor that ran off the end can be walked back.
#[derive(Clone, Debug)]
pub struct TableCursor {
    dir: Direction,
    idx: Option<usize>,
}

impl TableCursor {
    /// Cursor at the first occupied slot at or after `start` (forward) or
    /// at or before `start` (reverse); the end cursor if there is none or
    /// `start` is `None`.
    pub(crate) fn new<K, V, S>(
        map: &ProbeMap<K, V, S>,
        start: Option<usize>,
        dir: Direction,
    ) -> Self
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        let idx = start.and_then(|i| match dir {
            Direction::Forward => map.next_occupied(i),
            Direction::Reverse => map.prev_occupied(i),
        });
        Self { dir, idx }
    }

    /// Whether the cursor sits past the last entry in its direction.
    pub fn is_end(&self) -> bool {
        self.idx.is_none()
    }

    pub(crate) fn index(&self) -> Option<usize> {
        self.idx
    }

    /// Steps to the next occupied slot in the cursor's direction; at the
    /// end this is a no-op.
    pub fn advance<K, V, S>(&mut self, map: &ProbeMap<K, V, S>)
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        let Some(i) = self.idx else { return };
        self.idx = match self.dir {
            Direction::Forward => map.next_occupied(i + 1),
            Direction::Reverse => i.checked_sub(1).and_then(|j| map.prev_occupied(j)),
        };
    }

    /// Steps to the previous occupied slot in the cursor's direction.
    /// From the end position this re-enters at the boundary entry; at the
    /// first entry it stays put.
    pub fn retreat<K, V, S>(&mut self, map: &ProbeMap<K, V, S>)
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        match (self.dir, self.idx) {
            (Direction::Forward, None) => {
                self.idx = map.capacity().checked_sub(1).and_then(|j| map.prev_occupied(j));
            }
            (Direction::Forward, Some(i)) => {
                if let Some(j) = i.checked_sub(1).and_then(|j| map.prev_occupied(j)) {
                    self.idx = Some(j);
                }
            }
            (Direction::Reverse, None) => {
                self.idx = map.next_occupied(0);
            }
            (Direction::Reverse, Some(i)) => {
                if let Some(j) = map.next_occupied(i + 1) {
                    self.idx = Some(j);
                }
            }
        }
    }

    pub fn key<'a, K, V, S>(&self, map: &'a ProbeMap<K, V, S>) -> Option<&'a K>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        self.entry(map).map(|(k, _)| k)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a ProbeMap<K, V, S>) -> Option<&'a V>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        self.entry(map).map(|(_, v)| v)
    }

    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut ProbeMap<K, V, S>) -> Option<&'a mut V>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        match self.idx.and_then(|i| map.slot_mut(i)) {
            Some(Slot::Occupied(b)) => Some(&mut b.value),
            _ => None,
        }
    }

    /// The entry the cursor points at, or `None` at the end or when the
    /// slot no longer holds a live entry.
    pub fn entry<'a, K, V, S>(&self, map: &'a ProbeMap<K, V, S>) -> Option<(&'a K, &'a V)>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        match self.idx.and_then(|i| map.slot(i)) {
            Some(Slot::Occupied(b)) => Some((&b.key, &b.value)),
            _ => None,
        }
    }
}

impl PartialEq for TableCursor {
    /// Position equality: same slot (or both at the end) in the same
    /// direction.
    fn eq(&self, other: &Self) -> bool {
        self.dir == other.dir && self.idx == other.idx
    }
}

impl Eq for TableCursor {}

/// Borrowing iterator in slot order.
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(slots: &'a [Slot<K, V>]) -> Self {
        Self { slots: slots.iter() }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(b) = slot {
                return Some((&b.key, &b.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len()))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.slots.next_back() {
            if let Slot::Occupied(b) = slot {
                return Some((&b.key, &b.value));
            }
        }
        None
    }
}

/// Borrowing iterator with mutable values, in slot order.
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(slots: &'a mut [Slot<K, V>]) -> Self {
        Self {
            slots: slots.iter_mut(),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(b) = slot {
                return Some((&b.key, &mut b.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len()))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.slots.next_back() {
            if let Slot::Occupied(b) = slot {
                return Some((&b.key, &mut b.value));
            }
        }
        None
    }
}

/// Consuming iterator in slot order.
pub struct IntoIter<K, V> {
    slots: std::vec::IntoIter<Slot<K, V>>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(slots: Vec<Slot<K, V>>) -> Self {
        Self {
            slots: slots.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(Bucket { key, value, .. }) = slot {
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len()))
    }
}

pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}

pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

pub struct ValuesMut<'a, K, V>(pub(crate) IterMut<'a, K, V>);

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}
