//! treetable: an ordered tree map and a quadratic-probing hash map with
//! bidirectional, detachable cursors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: two keyed containers with the same insert/lookup/remove
//!   contract, differing only in what they buy with it.
//!   - TreeMap<K, V>: binary search tree over `K: Ord`; iteration is
//!     ascending key order; lookups are O(log n) on balanced input and
//!     O(n) on sorted input (no rebalancing).
//!   - ProbeMap<K, V, S>: flat open-addressing table over `K: Eq + Hash`
//!     with triangular quadratic probing and tombstone deletion; O(1)
//!     average lookups; iteration order is slot order, unspecified to
//!     callers.
//! - The shared contract is the `Dictionary<K, V>` trait, so client code
//!   can take either container behind one bound.
//!
//! Cursors
//! - `TreeCursor` and `TableCursor` are detachable positions: they hold
//!   ids/indices and no borrow of their map, so mutating operations such
//!   as `remove_at` and `swap_values` can take the map and the cursor in
//!   the same call. Every cursor read re-validates against the map, so a
//!   cursor outlived by its entry degrades to misses and no-ops.
//! - Both cursors are bidirectional with an explicit end position;
//!   stepping past the end is a no-op and `retreat` can re-enter the
//!   container from the end.
//!
//! Constraints
//! - Single-threaded use; `&mut` borrows serialize all mutation and the
//!   types carry no interior mutability.
//! - Tree nodes live in a `slotmap` arena, so node identity is a cheap
//!   generational key instead of a box pointer; a freed node id never
//!   aliases its successor.
//! - ProbeMap stores each entry's `u64` hash and never re-hashes a
//!   stored key except through the stored value during resize.
//! - Remove of an absent key and cursor steps past the end are defined
//!   no-ops; the only keyed error is `KeyNotFound` from `try_get`.
//!
//! Non-goals
//! - No tree rebalancing; adversarial insertion order degrades to a
//!   list.
//! - No incremental shrinking; `clear` is the only capacity reset.
//! - No concurrent access of any kind.

mod dictionary;
pub mod probe_iter;
pub mod probe_map;
pub mod tree_iter;
pub mod tree_map;

mod probe_map_proptest;
mod tree_map_proptest;

// Public surface
pub use dictionary::{Dictionary, KeyNotFound};
pub use probe_iter::TableCursor;
pub use probe_map::ProbeMap;
pub use tree_iter::TreeCursor;
pub use tree_map::TreeMap;
