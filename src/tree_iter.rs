//! Cursors and iterators over `TreeMap`.
//!
//! The cursor drives in-order traversal with two explicit stacks instead
//! of parent-chain walking: `spine` holds the ancestors whose far subtree
//! is still unvisited (the top is always the next node in order), and
//! `visited` records nodes already yielded so stepping backward is a pop
//! rather than predecessor logic. Decrementing at `fixed_root` cannot be
//! served by a pop, so the cursor rebuilds its initial spine instead, a
//! rare O(depth) re-walk.
//!
//! Cursors hold arena ids only and never borrow the map; every step and
//! dereference takes the map as an argument, so two cursors into the same
//! map can coexist with `&mut` operations such as `swap_values`.

use crate::tree_map::{Node, NodeId, TreeMap};
use slotmap::{SecondaryMap, SlotMap};

/// Traversal direction shared by both containers' cursors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Direction {
    Forward,
    Reverse,
}

/// Requested start position. `Begin` skips the positioning walk entirely;
/// `Node` walks from begin until the target is reached (end if `None`).
#[derive(Clone, Copy, Debug)]
pub(crate) enum Anchor {
    Begin,
    Node(Option<NodeId>),
}

/// Bidirectional position into a `TreeMap`. `is_end` is the sentinel
/// state; advancing past the last entry reaches it and further advances
/// are no-ops.
#[derive(Clone, Debug)]
pub struct TreeCursor {
    dir: Direction,
    root: Option<NodeId>,
    fixed_root: Option<NodeId>,
    cur: Option<NodeId>,
    spine: Vec<NodeId>,
    visited: Vec<NodeId>,
}

impl TreeCursor {
    pub(crate) fn new<K, V>(map: &TreeMap<K, V>, anchor: Anchor, dir: Direction) -> Self {
        let mut c = TreeCursor {
            dir,
            root: map.root,
            fixed_root: None,
            cur: None,
            spine: Vec::new(),
            visited: Vec::new(),
        };
        c.reset(map);
        if let Anchor::Node(target) = anchor {
            while c.cur != target && c.cur.is_some() {
                c.advance(map);
            }
        }
        c
    }

    /// Near child on the traversal side: the one whose subtree comes first.
    fn lo<K, V>(&self, map: &TreeMap<K, V>, id: NodeId) -> Option<NodeId> {
        let n = &map.arena[id];
        match self.dir {
            Direction::Forward => n.left,
            Direction::Reverse => n.right,
        }
    }

    /// Far child: the subtree visited after the node itself.
    fn hi<K, V>(&self, map: &TreeMap<K, V>, id: NodeId) -> Option<NodeId> {
        let n = &map.arena[id];
        match self.dir {
            Direction::Forward => n.right,
            Direction::Reverse => n.left,
        }
    }

    /// Rebuilds the initial spine and lands on the first entry.
    fn reset<K, V>(&mut self, map: &TreeMap<K, V>) {
        self.fixed_root = None;
        self.cur = None;
        self.spine.clear();
        self.visited.clear();
        let mut nd = self.root;
        while let Some(id) = nd {
            self.spine.push(id);
            nd = self.lo(map, id);
        }
        self.advance(map);
        self.fixed_root = if self.cur == self.root {
            self.cur
        } else {
            self.cur.and_then(|id| map.arena[id].parent)
        };
    }

    /// Steps to the next entry in this cursor's direction; at end this is
    /// a no-op. Pops the spine top into the current position, records the
    /// old position in `visited`, and pushes the near spine of the far
    /// child so the next pop is again the in-order successor.
    pub fn advance<K, V>(&mut self, map: &TreeMap<K, V>) {
        if let Some(c) = self.cur {
            self.visited.push(c);
        }
        match self.spine.pop() {
            None => self.cur = None,
            Some(id) => {
                self.cur = Some(id);
                let mut nd = self.hi(map, id);
                while let Some(c) = nd {
                    self.spine.push(c);
                    nd = self.lo(map, c);
                }
            }
        }
    }

    /// Steps to the previous entry; at the first entry this is a no-op.
    /// At `fixed_root` a pop cannot resume the near-side walk, so the
    /// cursor resets to the first entry instead.
    pub fn retreat<K, V>(&mut self, map: &TreeMap<K, V>) {
        if self.visited.is_empty() {
            return;
        }
        if self.cur == self.fixed_root {
            self.reset(map);
            return;
        }
        if let Some(c) = self.cur {
            self.spine.push(c);
        }
        self.cur = self.visited.pop();
    }

    pub fn is_end(&self) -> bool {
        self.cur.is_none()
    }

    pub(crate) fn node(&self) -> Option<NodeId> {
        self.cur
    }

    pub(crate) fn direction(&self) -> Direction {
        self.dir
    }

    pub fn key<'a, K, V>(&self, map: &'a TreeMap<K, V>) -> Option<&'a K> {
        self.cur.and_then(|id| map.arena.get(id)).map(|n| &n.key)
    }

    pub fn value<'a, K, V>(&self, map: &'a TreeMap<K, V>) -> Option<&'a V> {
        self.cur.and_then(|id| map.arena.get(id)).map(|n| &n.value)
    }

    pub fn value_mut<'a, K, V>(&self, map: &'a mut TreeMap<K, V>) -> Option<&'a mut V> {
        self.cur
            .and_then(|id| map.arena.get_mut(id))
            .map(|n| &mut n.value)
    }

    pub fn entry<'a, K, V>(&self, map: &'a TreeMap<K, V>) -> Option<(&'a K, &'a V)> {
        self.cur
            .and_then(|id| map.arena.get(id))
            .map(|n| (&n.key, &n.value))
    }
}

impl PartialEq for TreeCursor {
    /// Cursors compare by position; two end cursors of the same direction
    /// are equal regardless of how they got there.
    fn eq(&self, other: &Self) -> bool {
        self.cur == other.cur && self.dir == other.dir
    }
}

impl Eq for TreeCursor {}

/// Borrowed in-order iterator; the spine stack is the same machinery as
/// the cursor's forward half without the history needed for retreat.
pub struct Iter<'a, K, V> {
    map: &'a TreeMap<K, V>,
    spine: Vec<NodeId>,
    dir: Direction,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(map: &'a TreeMap<K, V>, dir: Direction) -> Self {
        let mut spine = Vec::new();
        let mut nd = map.root;
        while let Some(id) = nd {
            spine.push(id);
            let n = &map.arena[id];
            nd = match dir {
                Direction::Forward => n.left,
                Direction::Reverse => n.right,
            };
        }
        Iter { map, spine, dir }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.spine.pop()?;
        let node = &self.map.arena[id];
        let mut nd = match self.dir {
            Direction::Forward => node.right,
            Direction::Reverse => node.left,
        };
        while let Some(c) = nd {
            self.spine.push(c);
            let n = &self.map.arena[c];
            nd = match self.dir {
                Direction::Forward => n.left,
                Direction::Reverse => n.right,
            };
        }
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.spine.len(), Some(self.map.arena.len()))
    }
}

/// Mutable in-order iterator. The traversal order is fixed up front and
/// each entry's references are taken from one pass over the arena's own
/// mutable iterator, so every `(&K, &mut V)` pair is disjoint and no
/// unsafe aliasing is involved.
pub struct IterMut<'a, K, V> {
    order: std::vec::IntoIter<NodeId>,
    entries: SecondaryMap<NodeId, (&'a K, &'a mut V)>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(map: &'a mut TreeMap<K, V>, dir: Direction) -> Self
    where
        K: Ord,
    {
        let mut order = map.in_order_ids();
        if dir == Direction::Reverse {
            order.reverse();
        }
        let mut entries = SecondaryMap::new();
        for (id, node) in map.arena.iter_mut() {
            entries.insert(id, (&node.key, &mut node.value));
        }
        IterMut {
            order: order.into_iter(),
            entries,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        self.entries.remove(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

/// Consuming in-order iterator.
pub struct IntoIter<K, V> {
    order: std::vec::IntoIter<NodeId>,
    arena: SlotMap<NodeId, Node<K, V>>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(map: TreeMap<K, V>) -> Self
    where
        K: Ord,
    {
        let order = map.in_order_ids();
        IntoIter {
            order: order.into_iter(),
            arena: map.arena,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        self.arena.remove(id).map(|n| (n.key, n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }
}

pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
}

pub struct ValuesMut<'a, K, V>(pub(crate) IterMut<'a, K, V>);

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeMap<i32, i32> {
        [(0, 0), (1, 3), (2, 7), (3, 0)].into_iter().collect()
    }

    /// Invariant: advance/retreat are inverses around any interior
    /// position (modulo the fixed-root reset, which lands on begin).
    #[test]
    fn cursor_ping_pong() {
        let m = sample();
        let mut it = m.cursor();
        it.advance(&m);
        it.retreat(&m);
        assert_eq!(it, m.cursor());
        it.retreat(&m); // begin is a floor
        it.advance(&m);
        let mut second = m.cursor();
        second.advance(&m);
        assert_eq!(it, second);
    }

    /// Invariant: advancing past the last entry parks at end; retreating
    /// from end recovers the last entry.
    #[test]
    fn end_sentinel_round_trip() {
        let m = sample();
        let mut it = m.cursor();
        for _ in 0..4 {
            assert!(!it.is_end());
            it.advance(&m);
        }
        assert!(it.is_end());
        it.advance(&m); // no-op past end
        assert!(it.is_end());
        it.retreat(&m);
        assert_eq!(it.key(&m), Some(&3));
    }

    /// Invariant: a forward walk to end and back returns to the first
    /// entry.
    #[test]
    fn forward_then_backward_returns_to_first() {
        let m = sample();
        let mut it = m.cursor();
        for _ in 0..4 {
            it.advance(&m);
        }
        for _ in 0..4 {
            it.retreat(&m);
        }
        assert_eq!(it.key(&m), Some(&0));
    }

    /// Invariant: the reverse cursor visits entries in descending key
    /// order and shares the end-sentinel behavior.
    #[test]
    fn reverse_cursor_descends() {
        let m = sample();
        let mut it = m.cursor_rev();
        let mut seen = Vec::new();
        while let Some(k) = it.key(&m) {
            seen.push(*k);
            it.advance(&m);
        }
        assert_eq!(seen, vec![3, 2, 1, 0]);
        assert!(it.is_end());
        it.retreat(&m);
        assert_eq!(it.key(&m), Some(&0));
    }

    /// Invariant: `find` lands on the requested key with a usable
    /// traversal state; absent keys give the end cursor.
    #[test]
    fn find_positions_cursor() {
        let m = sample();
        let mut it = m.find(&2);
        assert_eq!(it.entry(&m), Some((&2, &7)));
        it.advance(&m);
        assert_eq!(it.key(&m), Some(&3));
        it.retreat(&m);
        it.retreat(&m);
        assert_eq!(it.key(&m), Some(&1));
        assert!(m.find(&42).is_end());
    }

    /// Invariant: min/max cursors land on the extreme keys.
    #[test]
    fn first_and_last() {
        let m: TreeMap<i32, i32> = [(4, 0), (2, 0), (9, 0), (7, 0)].into_iter().collect();
        assert_eq!(m.first().key(&m), Some(&2));
        assert_eq!(m.last().key(&m), Some(&9));
        let empty: TreeMap<i32, i32> = TreeMap::new();
        assert!(empty.first().is_end());
        assert!(empty.last().is_end());
    }

    /// Invariant: swapping two positions exchanges values only; swapping
    /// with end or with itself changes nothing.
    #[test]
    fn swap_values_via_cursors() {
        let mut m = sample();
        let a = m.find(&1);
        let b = m.find(&3);
        m.swap_values(&a, &b);
        assert_eq!(m.get(&1), Some(&0));
        assert_eq!(m.get(&3), Some(&3));
        let keys: Vec<i32> = m.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2, 3]);

        let end = m.find(&42);
        let before = m.clone();
        m.swap_values(&a, &end);
        m.swap_values(&a, &a);
        assert_eq!(m, before);
    }

    /// Invariant: `remove_at` removes the pointed-at entry and leaves the
    /// cursor on the in-order successor; at end it is a no-op.
    #[test]
    fn remove_at_advances_to_successor() {
        let mut m = sample();
        let mut it = m.cursor();
        it.advance(&m); // key 1
        m.remove_at(&mut it);
        assert_eq!(it.key(&m), Some(&2));
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![0, 2, 3]);

        // Removing the last entry parks the cursor at end.
        let mut last = m.last();
        m.remove_at(&mut last);
        assert!(last.is_end());
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![0, 2]);

        let mut end = m.find(&42);
        m.remove_at(&mut end);
        assert_eq!(m.len(), 2);
    }

    /// Invariant: removing the current root through a cursor keeps the
    /// successor reachable (payload relocation is tracked).
    #[test]
    fn remove_at_root_with_two_children() {
        let mut m: TreeMap<i32, i32> = [(5, 50), (3, 30), (8, 80), (7, 70)].into_iter().collect();
        let mut it = m.find(&5);
        m.remove_at(&mut it);
        assert_eq!(it.key(&m), Some(&7));
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![3, 7, 8]);
    }

    /// Invariant: mutable iteration visits every entry once in order, and
    /// writes are observed by later lookups.
    #[test]
    fn iter_mut_in_order() {
        let mut m = sample();
        let visited: Vec<i32> = m
            .iter_mut()
            .map(|(k, v)| {
                *v += 100;
                *k
            })
            .collect();
        assert_eq!(visited, vec![0, 1, 2, 3]);
        assert_eq!(m.get(&1), Some(&103));

        let rev: Vec<i32> = m.iter_mut_rev().map(|(k, _)| *k).collect();
        assert_eq!(rev, vec![3, 2, 1, 0]);
    }

    /// Invariant: `values_mut` writes through while `keys` stays ordered.
    #[test]
    fn values_mut_round_trip() {
        let mut m = sample();
        for v in m.values_mut() {
            *v *= 2;
        }
        assert_eq!(m.values().copied().collect::<Vec<_>>(), vec![0, 6, 14, 0]);
    }

    /// Invariant: a cursor on an empty map is end and all motion no-ops.
    #[test]
    fn empty_map_cursor() {
        let m: TreeMap<i32, i32> = TreeMap::new();
        let mut it = m.cursor();
        assert!(it.is_end());
        it.advance(&m);
        it.retreat(&m);
        assert!(it.is_end());
        assert_eq!(it.key(&m), None);
    }
}
