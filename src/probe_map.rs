//! ProbeMap: a hash map over a flat open-addressing slot table.
//!
//! Collisions are resolved by triangular-number quadratic probing: attempt
//! `i` visits `(h + (i² + i)/2) mod capacity`, which with a power-of-two
//! capacity cycles through every slot. Deletion marks the slot a
//! tombstone rather than emptying it, so probe sequences that ran through
//! the slot before the deletion still terminate correctly: a search stops
//! at the first `Empty` slot, never at a tombstone, while an insert claims
//! the first `Empty` or `Tombstone` slot. Tombstones are dropped wholesale
//! when a load-factor check doubles the table.
//!
//! Each entry stores its hash once at insert; the hasher is never re-run
//! on a stored key except to relocate it during a resize, so a key whose
//! hash is unstable corrupts the table (same contract as the hasher rule
//! in `std`).

use crate::dictionary::{Dictionary, KeyNotFound};
use crate::probe_iter::{IntoIter, Iter, IterMut, Keys, TableCursor, Values, ValuesMut};
use crate::tree_iter::Direction;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::Index;
use std::collections::hash_map::RandomState;

/// Capacity the table starts with and returns to on `clear`.
pub(crate) const INITIAL_SLOTS: usize = 2;

#[derive(Clone, Debug)]
pub(crate) struct Bucket<K, V> {
    pub(crate) hash: u64,
    pub(crate) key: K,
    pub(crate) value: V,
}

/// Per-slot state machine: `Empty → Occupied` on insert, `Occupied →
/// Tombstone` on remove, `Tombstone → Occupied` on re-insert, and back to
/// `Empty` only through a whole-table rebuild.
#[derive(Clone, Debug)]
pub(crate) enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied(Bucket<K, V>),
}

impl<K, V> Slot<K, V> {
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }
}

fn empty_slots<K, V>(n: usize) -> Vec<Slot<K, V>> {
    (0..n).map(|_| Slot::Empty).collect()
}

/// Deterministic probe sequence for `hash` over a table of `cap` slots.
fn probe_seq(hash: u64, cap: usize) -> impl Iterator<Item = usize> {
    (0..cap).map(move |i| (hash as usize).wrapping_add((i * i + i) / 2) % cap)
}

pub struct ProbeMap<K, V, S = RandomState> {
    slots: Vec<Slot<K, V>>,
    len: usize,
    hasher: S,
}

impl<K, V> ProbeMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V> Default for ProbeMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            slots: empty_slots(INITIAL_SLOTS),
            len: 0,
            hasher,
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slots, occupied or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Search probe: walks the sequence for `hash` until the key matches
    /// or an `Empty` slot proves absence. Tombstones do not terminate the
    /// walk; collapsing them into the empty case would lose entries
    /// inserted past a later-deleted slot.
    fn probe_find<Q>(&self, hash: u64, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        for idx in probe_seq(hash, self.slots.len()) {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Occupied(b) if b.hash == hash && b.key.borrow() == key => return Some(idx),
                _ => {}
            }
        }
        None
    }

    /// Insert probe: first reusable slot along the same sequence, which
    /// may be a tombstone left by an earlier removal.
    fn probe_vacant(&self, hash: u64) -> Option<usize> {
        probe_seq(hash, self.slots.len()).find(|&idx| !self.slots[idx].is_occupied())
    }

    /// Proactive doubling resize: runs before an insert whenever the load
    /// factor has reached one half, so an insert never lands in a table at
    /// the limit. Occupied buckets are re-probed into the new table with
    /// their stored hashes; tombstones do not survive.
    fn maybe_grow(&mut self) {
        if self.len * 2 < self.slots.len() {
            return;
        }
        let new_cap = self.slots.len() * 2;
        let old = mem::replace(&mut self.slots, empty_slots(new_cap));
        for slot in old {
            if let Slot::Occupied(b) = slot {
                let idx = self
                    .probe_vacant(b.hash)
                    .expect("doubled table has a vacant slot");
                self.slots[idx] = Slot::Occupied(b);
            }
        }
    }

    /// Insert-or-update; returns the previous value for an existing key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        self.maybe_grow();
        if let Some(idx) = self.probe_find(hash, &key) {
            let Slot::Occupied(b) = &mut self.slots[idx] else {
                unreachable!("probe_find only returns occupied slots")
            };
            return Some(mem::replace(&mut b.value, value));
        }
        let idx = self
            .probe_vacant(hash)
            .expect("table below the load limit has a vacant slot");
        self.slots[idx] = Slot::Occupied(Bucket { hash, key, value });
        self.len += 1;
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.probe_find(self.make_hash(key), key)?;
        match &self.slots[idx] {
            Slot::Occupied(b) => Some(&b.value),
            _ => None,
        }
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.probe_find(self.make_hash(key), key)?;
        match &mut self.slots[idx] {
            Slot::Occupied(b) => Some(&mut b.value),
            _ => None,
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.probe_find(self.make_hash(key), key).is_some()
    }

    pub fn try_get<Q>(&self, key: &Q) -> Result<&V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).ok_or(KeyNotFound)
    }

    /// Looks up `key` and, when absent, inserts `default()` first,
    /// growing the table if needed. Never fails for a valid key.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        let idx = match self.probe_find(hash, &key) {
            Some(idx) => idx,
            None => {
                self.maybe_grow();
                let idx = self
                    .probe_vacant(hash)
                    .expect("table below the load limit has a vacant slot");
                self.slots[idx] = Slot::Occupied(Bucket {
                    hash,
                    key,
                    value: default(),
                });
                self.len += 1;
                idx
            }
        };
        match &mut self.slots[idx] {
            Slot::Occupied(b) => &mut b.value,
            _ => unreachable!("slot was just found or filled"),
        }
    }

    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Removes `key` if present, leaving a tombstone in its slot; absent
    /// keys are a no-op. The slot is not reclaimed until the next resize.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.probe_find(self.make_hash(key), key)?;
        let Slot::Occupied(b) = mem::replace(&mut self.slots[idx], Slot::Tombstone) else {
            unreachable!("probe_find only returns occupied slots")
        };
        self.len -= 1;
        Some(b.value)
    }

    /// Removes the entry the cursor points at, advancing the cursor past
    /// it first. End cursors and cursors left behind by a resize are
    /// no-ops.
    pub fn remove_at(&mut self, cursor: &mut TableCursor) {
        let Some(idx) = cursor.index() else { return };
        cursor.advance(self);
        if idx < self.slots.len() && self.slots[idx].is_occupied() {
            self.slots[idx] = Slot::Tombstone;
            self.len -= 1;
        }
    }

    /// Exchanges the values of two cursor positions; slots, keys and
    /// cached hashes stay put. End cursors and self-swaps are no-ops.
    pub fn swap_values(&mut self, a: &TableCursor, b: &TableCursor) {
        let (Some(i), Some(j)) = (a.index(), b.index()) else {
            return;
        };
        if i == j || i >= self.slots.len() || j >= self.slots.len() {
            return;
        }
        let (lo, hi) = (i.min(j), i.max(j));
        let (head, tail) = self.slots.split_at_mut(hi);
        if let (Slot::Occupied(x), Slot::Occupied(y)) = (&mut head[lo], &mut tail[0]) {
            mem::swap(&mut x.value, &mut y.value);
        }
    }

    /// First entry (in slot order) whose value satisfies `pred`, as a
    /// cursor; the end cursor if none does.
    pub fn find_by_value<F>(&self, mut pred: F) -> TableCursor
    where
        F: FnMut(&V) -> bool,
    {
        let mut c = self.cursor();
        while let Some(v) = c.value(self) {
            if pred(v) {
                break;
            }
            c.advance(self);
        }
        c
    }

    /// Removes entries whose value satisfies `pred`; the first match only
    /// unless `all`. Returns how many entries were removed.
    pub fn remove_values<F>(&mut self, mut pred: F, all: bool) -> usize
    where
        F: FnMut(&V) -> bool,
    {
        let mut removed = 0;
        for idx in 0..self.slots.len() {
            if let Slot::Occupied(b) = &self.slots[idx] {
                if pred(&b.value) {
                    self.slots[idx] = Slot::Tombstone;
                    self.len -= 1;
                    removed += 1;
                    if !all {
                        break;
                    }
                }
            }
        }
        removed
    }

    /// Reallocates down to the initial capacity and forgets every entry.
    pub fn clear(&mut self) {
        self.slots = empty_slots(INITIAL_SLOTS);
        self.len = 0;
    }

    /// Cursor at the first occupied slot.
    pub fn cursor(&self) -> TableCursor {
        TableCursor::new(self, Some(0), Direction::Forward)
    }

    /// Cursor at the last occupied slot, stepping toward slot zero.
    pub fn cursor_rev(&self) -> TableCursor {
        TableCursor::new(self, self.slots.len().checked_sub(1), Direction::Reverse)
    }

    /// Cursor at `key`'s slot, or the end cursor if absent.
    pub fn find<Q>(&self, key: &Q) -> TableCursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.probe_find(self.make_hash(key), key);
        TableCursor::new(self, idx, Direction::Forward)
    }

    pub(crate) fn slot(&self, idx: usize) -> Option<&Slot<K, V>> {
        self.slots.get(idx)
    }

    pub(crate) fn slot_mut(&mut self, idx: usize) -> Option<&mut Slot<K, V>> {
        self.slots.get_mut(idx)
    }

    pub(crate) fn next_occupied(&self, from: usize) -> Option<usize> {
        (from..self.slots.len()).find(|&i| self.slots[i].is_occupied())
    }

    pub(crate) fn prev_occupied(&self, from: usize) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }
        let from = from.min(self.slots.len() - 1);
        (0..=from).rev().find(|&i| self.slots[i].is_occupied())
    }

    /// Entries in slot order — a function of hashing and probing, not of
    /// insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.slots)
    }

    /// Entries in slot order with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.slots)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }
}

impl<K, V, S> Clone for ProbeMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            len: self.len,
            hasher: self.hasher.clone(),
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    /// Later duplicates overwrite earlier ones for the same key.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ProbeMap::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for ProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> PartialEq for ProbeMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    /// Per-element comparison; slot layout and capacity are irrelevant.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for ProbeMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> fmt::Debug for ProbeMap<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S, Q> Index<&Q> for ProbeMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    S: BuildHasher,
    Q: ?Sized + Hash + Eq,
{
    type Output = V;

    /// Immutable indexed access; panics if the key is absent. Use `get`
    /// or `try_get` for non-panicking reads.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, S> IntoIterator for ProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.slots)
    }
}

impl<'a, K, V, S> IntoIterator for &'a ProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> Dictionary<K, V> for ProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        ProbeMap::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        ProbeMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        ProbeMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        ProbeMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        ProbeMap::remove(self, key)
    }

    fn clear(&mut self) {
        ProbeMap::clear(self)
    }
}
