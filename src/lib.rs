//! ordered-map: a single-owner map that preserves insertion order and can
//! be addressed either by key or by position.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one container, two views. Lookup by key is a hash probe; lookup
//!   by position is a slice index. Both views always agree.
//! - Layout:
//!   - `entries: Vec<Entry<K, V>>` holds key, value and cached hash in
//!     position order. `entries[i]` is the entry at position `i`.
//!   - `index: HashTable<usize>` maps a key's hash to the entry's current
//!     position.
//!
//! Invariants (after every public call)
//! - `index.len() == entries.len()`.
//! - Every position `0..len` appears exactly once in `index`, filed under
//!   the hash cached in `entries[position]`.
//! - Keys are unique.
//!
//! Positions
//! - Positions are dense. Removing position `p` shifts every entry after
//!   `p` down by one and rewrites their index slots, so removal is O(n).
//!   Positions are not stable handles; keys are.
//!
//! Hashing
//! - Each entry stores its `u64` hash. `K: Hash` runs once per key on
//!   insert or rename and never again; growth, removal and renumbering use
//!   the stored hash.
//!
//! Failure model
//! - Misuse (duplicate key, missing key, bad position) returns a
//!   [`MapError`] and leaves the map untouched.
//! - A disagreement between `index` and `entries` is a bug in this crate and
//!   panics with "internal invariant violated". `len()` checks sizes on
//!   every call.
//!
//! Renames
//! - `rename_key`/`rename_index` keep value and position. Renaming onto a
//!   key held by a different entry is rejected with `DuplicateKey`.
//!
//! Unchecked removal
//! - `remove_fast(index, key)` skips the key lookup. The key is only
//!   compared in debug builds; a wrong key in release builds removes the
//!   entry at `index` regardless. It never breaks memory safety.
//!
//! Notes and non-goals
//! - No interior mutability: readers share `&OrderedMap`, writers hold
//!   `&mut OrderedMap`. The map is `Send`/`Sync` whenever `K`, `V`, `S` are.
//! - No `FromIterator`/`Extend`: both would need an overwrite policy for
//!   repeated keys, and this map rejects them instead.
//! - Values are dropped normally on removal or clear; `Rc`/`Arc` values just
//!   lose the map's reference.

mod error;
mod iter;
mod ordered_map;
mod ordered_map_proptest;

// Public surface
pub use error::MapError;
pub use iter::{Iter, IterMut, Keys, Values, ValuesMut};
pub use ordered_map::OrderedMap;
