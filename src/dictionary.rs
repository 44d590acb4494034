//! Shared key-value contract satisfied by both containers.
//!
//! Client code that does not care whether its table is ordered or hashed
//! (an object model keyed by strings, a named-options table) can take a
//! `Dictionary<K, V>` and work against either `TreeMap` or `ProbeMap`.

use core::fmt;

/// The one steady-state failure either container can raise: a keyed read
/// of an absent entry. Removing an absent key or stepping a cursor past
/// the end are defined no-ops, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNotFound;

impl fmt::Display for KeyNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key not found")
    }
}

impl std::error::Error for KeyNotFound {}

/// Operations both containers satisfy identically.
///
/// `insert` is insert-or-update: an existing key keeps its node/slot and
/// only the value is replaced, with the previous value returned. `remove`
/// of an absent key returns `None` without touching the structure.
pub trait Dictionary<K, V> {
    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &K) -> Option<&V>;

    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Fallible keyed read for callers that want an error value instead of
    /// an `Option` or the panicking `Index` impl.
    fn try_get(&self, key: &K) -> Result<&V, KeyNotFound> {
        self.get(key).ok_or(KeyNotFound)
    }

    /// Insert-or-update; returns the value previously stored under `key`.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Removes `key` if present; absent keys are a no-op.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Drops every entry and releases or resets the backing storage.
    fn clear(&mut self);
}
