//! TreeMap: an order-preserving map over a binary search tree.
//!
//! Nodes live in a `slotmap` arena; `left`/`right`/`parent` are arena ids,
//! so the parent back-link is a non-owning reference and stale cursor ids
//! resolve to `None` through the arena's generation check instead of
//! dangling. The tree is a plain BST: depth is a function of insertion
//! order, and callers needing worst-case guarantees must pre-shuffle keys.

use crate::dictionary::{Dictionary, KeyNotFound};
use crate::tree_iter::{Anchor, Direction, IntoIter, Iter, IterMut, Keys, TreeCursor, Values, ValuesMut};
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::mem;
use core::ops::Index;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena id of a tree node.
    pub(crate) struct NodeId;
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

/// Where a key descent ended up: an existing node, or the link under which
/// a new node must be attached.
enum Place {
    Found(NodeId),
    Vacant { parent: Option<NodeId>, left: bool },
}

#[derive(Clone)]
pub struct TreeMap<K, V> {
    pub(crate) arena: SlotMap<NodeId, Node<K, V>>,
    pub(crate) root: Option<NodeId>,
}

impl<K, V> TreeMap<K, V>
where
    K: Ord,
{
    pub fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    fn locate<Q>(&self, key: &Q) -> Place
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(mut cur) = self.root else {
            return Place::Vacant {
                parent: None,
                left: false,
            };
        };
        loop {
            match key.cmp(self.arena[cur].key.borrow()) {
                Ordering::Equal => return Place::Found(cur),
                Ordering::Less => match self.arena[cur].left {
                    Some(l) => cur = l,
                    None => {
                        return Place::Vacant {
                            parent: Some(cur),
                            left: true,
                        }
                    }
                },
                Ordering::Greater => match self.arena[cur].right {
                    Some(r) => cur = r,
                    None => {
                        return Place::Vacant {
                            parent: Some(cur),
                            left: false,
                        }
                    }
                },
            }
        }
    }

    pub(crate) fn find_node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.locate(key) {
            Place::Found(id) => Some(id),
            Place::Vacant { .. } => None,
        }
    }

    fn attach(&mut self, key: K, value: V, parent: Option<NodeId>, left: bool) -> NodeId {
        let id = self.arena.insert(Node {
            key,
            value,
            left: None,
            right: None,
            parent,
        });
        match parent {
            None => self.root = Some(id),
            Some(p) => {
                if left {
                    self.arena[p].left = Some(id);
                } else {
                    self.arena[p].right = Some(id);
                }
            }
        }
        id
    }

    /// Insert-or-update. An existing key keeps its node (the stored key is
    /// not replaced) and the previous value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.locate(&key) {
            Place::Found(id) => Some(mem::replace(&mut self.arena[id].value, value)),
            Place::Vacant { parent, left } => {
                self.attach(key, value, parent, left);
                None
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find_node(key).map(|id| &self.arena[id].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let id = self.find_node(key)?;
        Some(&mut self.arena[id].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find_node(key).is_some()
    }

    pub fn try_get<Q>(&self, key: &Q) -> Result<&V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(key).ok_or(KeyNotFound)
    }

    /// Looks up `key` and, when absent, inserts `default()` first.
    /// The mutable counterpart of indexed access: it never fails for a
    /// valid key.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let id = match self.locate(&key) {
            Place::Found(id) => id,
            Place::Vacant { parent, left } => self.attach(key, default(), parent, left),
        };
        &mut self.arena[id].value
    }

    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Unlinks `victim` from the tree, leaving its links untouched for the
    /// caller to splice over.
    fn splice(&mut self, victim: NodeId, child: Option<NodeId>) {
        let parent = self.arena[victim].parent;
        if let Some(c) = child {
            self.arena[c].parent = parent;
        }
        match parent {
            None => self.root = child,
            Some(p) => {
                if self.arena[p].left == Some(victim) {
                    self.arena[p].left = child;
                } else {
                    self.arena[p].right = child;
                }
            }
        }
    }

    /// Standard BST deletion. A node with two children swaps payloads with
    /// its in-order successor and the successor's slot is the one spliced
    /// out; the second return value names that slot so cursors pointing at
    /// it can be redirected to `id`, where the payload now lives.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> ((K, V), Option<NodeId>) {
        let (left, right) = {
            let n = &self.arena[id];
            (n.left, n.right)
        };
        let (victim, relocated) = match (left, right) {
            (Some(_), Some(r)) => {
                let mut succ = r;
                while let Some(l) = self.arena[succ].left {
                    succ = l;
                }
                let [a, b] = self
                    .arena
                    .get_disjoint_mut([id, succ])
                    .expect("node and successor are distinct live nodes");
                mem::swap(&mut a.key, &mut b.key);
                mem::swap(&mut a.value, &mut b.value);
                (succ, Some(succ))
            }
            _ => (id, None),
        };
        let child = {
            let n = &self.arena[victim];
            n.left.or(n.right)
        };
        self.splice(victim, child);
        let node = self
            .arena
            .remove(victim)
            .expect("victim was just unlinked from a live tree");
        ((node.key, node.value), relocated)
    }

    /// Removes `key` if present; absent keys are a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let id = self.find_node(key)?;
        let ((_, value), _) = self.remove_node(id);
        Some(value)
    }

    /// Removes the entry the cursor points at and repositions the cursor
    /// at the in-order successor (in the cursor's direction). A cursor at
    /// end, or one made stale by an earlier structural change, is left
    /// alone.
    pub fn remove_at(&mut self, cursor: &mut TreeCursor) {
        let Some(target) = cursor.node() else { return };
        if self.arena.get(target).is_none() {
            return;
        }
        let mut next = cursor.clone();
        next.advance(self);
        let mut succ = next.node();
        let (_, relocated) = self.remove_node(target);
        if relocated.is_some() && succ == relocated {
            // Successor payload moved into the removed node's slot.
            succ = Some(target);
        }
        *cursor = TreeCursor::new(self, Anchor::Node(succ), cursor.direction());
    }

    /// Exchanges the values of two cursor positions. Tree shape and keys
    /// are untouched; end cursors and self-swaps are no-ops.
    pub fn swap_values(&mut self, a: &TreeCursor, b: &TreeCursor) {
        let (Some(x), Some(y)) = (a.node(), b.node()) else {
            return;
        };
        if x == y {
            return;
        }
        if let Some([na, nb]) = self.arena.get_disjoint_mut([x, y]) {
            mem::swap(&mut na.value, &mut nb.value);
        }
    }

    /// Drops the whole tree. The arena releases nodes slot by slot, so no
    /// recursion is involved regardless of depth.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Cursor positioned at the smallest key ("begin").
    pub fn cursor(&self) -> TreeCursor {
        TreeCursor::new(self, Anchor::Begin, Direction::Forward)
    }

    /// Cursor positioned at the largest key, stepping descending.
    pub fn cursor_rev(&self) -> TreeCursor {
        TreeCursor::new(self, Anchor::Begin, Direction::Reverse)
    }

    /// Cursor at `key`, or the end cursor if absent. The lookup is a tree
    /// descent; positioning the cursor walks from begin.
    pub fn find<Q>(&self, key: &Q) -> TreeCursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        TreeCursor::new(self, Anchor::Node(self.find_node(key)), Direction::Forward)
    }

    /// Cursor at the minimum key (left spine descent).
    pub fn first(&self) -> TreeCursor {
        let mut nd = self.root;
        while let Some(id) = nd {
            match self.arena[id].left {
                Some(l) => nd = Some(l),
                None => break,
            }
        }
        TreeCursor::new(self, Anchor::Node(nd), Direction::Forward)
    }

    /// Cursor at the maximum key (right spine descent).
    pub fn last(&self) -> TreeCursor {
        let mut nd = self.root;
        while let Some(id) = nd {
            match self.arena[id].right {
                Some(r) => nd = Some(r),
                None => break,
            }
        }
        TreeCursor::new(self, Anchor::Node(nd), Direction::Forward)
    }

    /// First entry (in key order) whose value satisfies `pred`, as a
    /// cursor; the end cursor if none does.
    pub fn find_by_value<F>(&self, mut pred: F) -> TreeCursor
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
        loop {
            let hit = self
                .in_order_ids()
                .into_iter()
                .find(|&id| pred(&self.arena[id].value));
            match hit {
                Some(id) => {
                    self.remove_node(id);
                    removed += 1;
                    if !all {
                        break;
                    }
                }
                None => break,
            }
        }
        removed
    }

    /// Node ids in ascending key order.
    pub(crate) fn in_order_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut spine = Vec::new();
        let mut nd = self.root;
        while let Some(id) = nd {
            spine.push(id);
            nd = self.arena[id].left;
        }
        while let Some(id) = spine.pop() {
            out.push(id);
            let mut nd = self.arena[id].right;
            while let Some(c) = nd {
                spine.push(c);
                nd = self.arena[c].left;
            }
        }
        out
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self, Direction::Forward)
    }

    /// Entries in descending key order.
    pub fn iter_rev(&self) -> Iter<'_, K, V> {
        Iter::new(self, Direction::Reverse)
    }

    /// Entries in ascending key order with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self, Direction::Forward)
    }

    /// Entries in descending key order with mutable values.
    pub fn iter_mut_rev(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self, Direction::Reverse)
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

impl<K: Ord, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    /// Later duplicates overwrite earlier ones for the same key.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for TreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V: PartialEq> PartialEq for TreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
    }
}

impl<K: Ord, V: Eq> Eq for TreeMap<K, V> {}

impl<K, V> fmt::Debug for TreeMap<K, V>
where
    K: Ord + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, Q> Index<&Q> for TreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Immutable indexed access; panics if the key is absent. Use `get`
    /// or `try_get` for non-panicking reads.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a TreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a mut TreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: Ord, V> IntoIterator for TreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<K: Ord, V> Dictionary<K, V> for TreeMap<K, V> {
    fn len(&self) -> usize {
        TreeMap::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        TreeMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        TreeMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        TreeMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        TreeMap::remove(self, key)
    }

    fn clear(&mut self) {
        TreeMap::clear(self)
    }
}
