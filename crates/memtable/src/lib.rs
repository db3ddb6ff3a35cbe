//! # Memtable
//!
//! The in-memory, sorted write buffer for the JumpDB storage engine.
//!
//! The memtable is the first point of contact for every write. It buffers
//! recent `set`/`delete` operations in a sorted structure (`BTreeMap`) until
//! the engine flushes it to an immutable on-disk segment.
//!
//! ## Key properties
//! - **Sorted order**: entries are always in ascending key order (required
//!   for the segment writer, which needs a strictly-ascending-key stream).
//! - **At most one entry per key**: a later `put`/`delete` overwrites any
//!   earlier entry for the same key, exactly as the engine's read-your-writes
//!   contract requires.
//! - **Tombstone support**: deletes are recorded as [`Entry::Tombstone`], not
//!   removed from the map, so a `delete` of a key still present in an
//!   on-disk segment is recorded and later shadows it.
//!
//! ## Example
//! ```rust
//! use memtable::{Entry, Memtable};
//!
//! let mut m = Memtable::new();
//! m.put(b"hello".to_vec(), b"world".to_vec());
//! assert_eq!(m.get(b"hello"), Some(b"world".as_slice()));
//!
//! m.delete(b"hello".to_vec());
//! assert_eq!(m.get(b"hello"), None);
//! assert_eq!(m.get_entry(b"hello"), Some(&Entry::Tombstone));
//! ```

use std::collections::BTreeMap;

/// A single value slot in the memtable.
///
/// - `Value(bytes)` — the key holds a live value.
/// - `Tombstone` — the key has been deleted; this shadows any older value
///   of the same key in an on-disk segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A live value.
    Value(Vec<u8>),
    /// A delete marker.
    Tombstone,
}

impl Entry {
    /// Returns the value bytes, or `None` for a tombstone.
    #[must_use]
    pub fn as_value(&self) -> Option<&[u8]> {
        match self {
            Entry::Value(v) => Some(v),
            Entry::Tombstone => None,
        }
    }

    /// Returns `true` if this entry is a tombstone.
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Entry::Tombstone)
    }
}

/// An ordered, in-memory write buffer backed by a `BTreeMap`.
///
/// The engine decides when to flush based on [`Memtable::len`] against its
/// configured `max_inmemory_size` (an entry count, not a byte budget).
#[derive(Debug, Default)]
pub struct Memtable {
    map: BTreeMap<Vec<u8>, Entry>,
}

impl Memtable {
    /// Creates a new, empty memtable.
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Inserts or overwrites `key` with a live value.
    ///
    /// A later `put` or `delete` for the same key always overwrites an
    /// earlier one in the same memtable generation — there is no
    /// sequence-number gate here because a memtable only ever sees writes in
    /// the order the caller issued them.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.map.insert(key, Entry::Value(value));
    }

    /// Records a tombstone for `key`.
    ///
    /// It is not an error to delete a key that isn't present in this
    /// memtable — the tombstone is still recorded, because an older
    /// on-disk segment may hold a value for it that must be shadowed.
    pub fn delete(&mut self, key: Vec<u8>) {
        self.map.insert(key, Entry::Tombstone);
    }

    /// Returns the live value for `key`, or `None` if the key is absent or
    /// tombstoned.
    ///
    /// Prefer [`get_entry`](Memtable::get_entry) when the caller needs to
    /// distinguish "not present in this memtable" from "deleted".
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.map.get(key).and_then(Entry::as_value)
    }

    /// Returns the raw [`Entry`] for `key`, if this memtable has one.
    #[must_use]
    pub fn get_entry(&self, key: &[u8]) -> Option<&Entry> {
        self.map.get(key)
    }

    /// Returns `true` if this memtable has any entry (value or tombstone)
    /// for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.map.contains_key(key)
    }

    /// Returns an iterator over all entries in ascending key order.
    ///
    /// This includes tombstones — required for a correct flush, since the
    /// segment writer must see every tombstone to make it discoverable on
    /// disk.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Entry)> {
        self.map.iter().map(|(k, v)| (k.as_slice(), v))
    }

    /// Returns the number of entries (including tombstones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the memtable contains zero entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes all entries, resetting the memtable to empty.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests;
