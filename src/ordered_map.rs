//! OrderedMap: insertion-ordered storage with a hashed key index.

use crate::error::MapError;
use crate::iter::{Iter, IterMut, Keys, Values, ValuesMut};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::{Index, IndexMut};
use hashbrown::hash_table;
use hashbrown::HashTable;
use std::collections::hash_map::RandomState;

#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    hash: u64,
}

/// A map that remembers insertion order.
///
/// Entries live in a `Vec` in position order; a `HashTable` maps each key's
/// cached hash to the entry's current position. Positions are dense: removing
/// an entry shifts every later entry down by one.
#[derive(Clone)]
pub struct OrderedMap<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<usize>, // positions into `entries`
    entries: Vec<Entry<K, V>>,
}

#[cold]
#[track_caller]
fn invariant_violation(what: &str) -> ! {
    panic!("ordered_map: internal invariant violated: {what}")
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V, S> Default for OrderedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    /// Number of live entries.
    ///
    /// Panics if the key index and the entry list disagree in size; that can
    /// only happen through a bug in this crate.
    pub fn len(&self) -> usize {
        self.check_sizes();
        self.entries.len()
    }

    fn check_sizes(&self) {
        if self.index.len() != self.entries.len() {
            invariant_violation("key index size doesn't match entry count");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_index(&self, index: usize) -> Result<(), MapError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(MapError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    /// Value at position `index`.
    pub fn get_index(&self, index: usize) -> Result<&V, MapError> {
        self.check_index(index)?;
        Ok(&self.entries[index].value)
    }

    /// Mutable value at position `index`. Key and position are unaffected.
    pub fn get_index_mut(&mut self, index: usize) -> Result<&mut V, MapError> {
        self.check_index(index)?;
        Ok(&mut self.entries[index].value)
    }

    /// Key at position `index`.
    pub fn key_at(&self, index: usize) -> Result<&K, MapError> {
        self.check_index(index)?;
        Ok(&self.entries[index].key)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.entries.first().map(|e| (&e.key, &e.value))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.entries.last().map(|e| (&e.key, &e.value))
    }

    /// Remove the entry at position `index`, returning it. Later entries
    /// move down one position.
    pub fn remove_index(&mut self, index: usize) -> Result<(K, V), MapError> {
        self.check_index(index)?;
        Ok(self.remove_at(index))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.entries.iter())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.entries.iter_mut())
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.entries.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.entries.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.entries.iter_mut())
    }

    // Caller guarantees `position < entries.len()`.
    fn remove_at(&mut self, position: usize) -> (K, V) {
        let hash = self.entries[position].hash;
        match self.index.find_entry(hash, |&i| i == position) {
            Ok(occupied) => {
                occupied.remove();
            }
            Err(_) => invariant_violation("removed entry missing from key index"),
        }
        let removed = self.entries.remove(position);

        // Every entry after `position` slid down by one. Walking upward keeps
        // the value being searched for unique in the table.
        for (pos, entry) in self.entries.iter().enumerate().skip(position) {
            match self.index.find_mut(entry.hash, |&i| i == pos + 1) {
                Some(i) => *i = pos,
                None => invariant_violation("shifted entry missing from key index"),
            }
        }

        self.check_sizes();
        (removed.key, removed.value)
    }

    /// Check every structural invariant, panicking on the first violation.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.index.len(), self.entries.len(), "size mismatch");
        let mut seen = vec![false; self.entries.len()];
        for &i in self.index.iter() {
            assert!(i < self.entries.len(), "index position {i} out of range");
            assert!(!seen[i], "position {i} indexed twice");
            seen[i] = true;
        }
        for (pos, entry) in self.entries.iter().enumerate() {
            assert_eq!(
                self.index.find(entry.hash, |&i| i == pos),
                Some(&pos),
                "entry at {pos} not reachable through its hash"
            );
        }
    }
}

impl<K, V, S> OrderedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn find_position<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.index
            .find(hash, |&i| {
                self.entries
                    .get(i)
                    .map(|e| e.key.borrow() == q)
                    .unwrap_or(false)
            })
            .copied()
    }

    /// Append `key -> value` at the end. Fails with `DuplicateKey` if the key
    /// is already present, leaving the map untouched.
    pub fn push_back(&mut self, key: K, value: V) -> Result<&mut V, MapError> {
        self.push_back_with(key, || value)
    }

    /// Like `push_back`, but only builds the value once the key is known to
    /// be new.
    pub fn push_back_with<F>(&mut self, key: K, default: F) -> Result<&mut V, MapError>
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        let position = match self.index.entry(
            hash,
            |&i| self.entries.get(i).map(|e| e.key == key).unwrap_or(false),
            |&i| self.entries.get(i).map(|e| e.hash).unwrap_or(0),
        ) {
            hash_table::Entry::Occupied(_) => return Err(MapError::DuplicateKey),
            hash_table::Entry::Vacant(v) => {
                let value = default();
                let position = self.entries.len();
                self.entries.push(Entry { key, value, hash });
                let _ = v.insert(position);
                position
            }
        };
        self.check_sizes();
        Ok(&mut self.entries[position].value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_position(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find_position(q).ok_or(MapError::KeyNotFound)?;
        Ok(&self.entries[i].value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find_position(q).ok_or(MapError::KeyNotFound)?;
        Ok(&mut self.entries[i].value)
    }

    /// Current position of `q`.
    pub fn index_of<Q>(&self, q: &Q) -> Result<usize, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_position(q).ok_or(MapError::KeyNotFound)
    }

    /// Give the entry at `index` a new key, keeping its value and position.
    ///
    /// Fails with `DuplicateKey` if `new_key` already names another entry.
    pub fn rename_index(&mut self, index: usize, new_key: K) -> Result<(), MapError> {
        self.check_index(index)?;
        self.rename_at(index, new_key)
    }

    /// Give the entry keyed `old` a new key, keeping its value and position.
    ///
    /// Fails with `DuplicateKey` if `new_key` already names another entry.
    pub fn rename_key<Q>(&mut self, old: &Q, new_key: K) -> Result<(), MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find_position(old).ok_or(MapError::KeyNotFound)?;
        self.rename_at(i, new_key)
    }

    fn rename_at(&mut self, position: usize, new_key: K) -> Result<(), MapError> {
        let new_hash = self.make_hash(&new_key);
        let clash = self.index.find(new_hash, |&i| {
            self.entries
                .get(i)
                .map(|e| e.key == new_key)
                .unwrap_or(false)
        });
        if matches!(clash, Some(&other) if other != position) {
            return Err(MapError::DuplicateKey);
        }

        let old_hash = self.entries[position].hash;
        match self.index.find_entry(old_hash, |&i| i == position) {
            Ok(occupied) => {
                occupied.remove();
            }
            Err(_) => invariant_violation("renamed entry missing from key index"),
        }
        let old_key = {
            let entry = &mut self.entries[position];
            entry.hash = new_hash;
            core::mem::replace(&mut entry.key, new_key)
        };
        let entries = &self.entries;
        self.index
            .insert_unique(new_hash, position, |&i| entries[i].hash);

        // Dropped only once the index is whole again.
        drop(old_key);
        Ok(())
    }

    /// Remove the entry keyed `q`, returning it. Later entries move down one
    /// position.
    pub fn remove<Q>(&mut self, q: &Q) -> Result<(K, V), MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find_position(q).ok_or(MapError::KeyNotFound)?;
        Ok(self.remove_at(i))
    }

    /// Remove the entry at `index` without looking `key` up.
    ///
    /// The caller promises that `key` is the key stored at `index`; this is
    /// only checked in debug builds. A mismatched key in release builds
    /// removes the entry at `index` anyway.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`, and in debug builds if `key` does not
    /// match.
    pub fn remove_fast<Q>(&mut self, index: usize, key: &Q) -> (K, V)
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        debug_assert!(
            self.entries[index].key.borrow() == key,
            "remove_fast: key doesn't match the entry at index {index}"
        );
        self.remove_at(index)
    }
}

impl<K, V, S> Index<usize> for OrderedMap<K, V, S> {
    type Output = V;

    #[track_caller]
    fn index(&self, index: usize) -> &V {
        match self.get_index(index) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K, V, S> IndexMut<usize> for OrderedMap<K, V, S> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut V {
        match self.get_index_mut(index) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K, V, Q, S> Index<&Q> for OrderedMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    #[track_caller]
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K, V, Q, S> IndexMut<&Q> for OrderedMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    #[track_caller]
    fn index_mut(&mut self, key: &Q) -> &mut V {
        match self.get_mut(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for OrderedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Order-sensitive: equal maps hold equal entries at equal positions.
impl<K: PartialEq, V: PartialEq, S> PartialEq for OrderedMap<K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, S> Eq for OrderedMap<K, V, S> {}

impl<'a, K, V, S> IntoIterator for &'a OrderedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut OrderedMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
