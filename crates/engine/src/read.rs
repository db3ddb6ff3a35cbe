//! Read path: `get()` and `contains()`.
//!
//! Point lookups check the memtable first (freshest data, including
//! tombstones), then segments newest-first. The first hit — value or
//! tombstone — wins; a tombstone resolves to *not found* without probing
//! older segments.

use sstable::Lookup;

use crate::error::EngineError;
use crate::Engine;

impl Engine {
    /// Looks up `key`, returning its live value if present.
    ///
    /// Checks the memtable, then segments newest to oldest. A tombstone at
    /// any layer shadows older values and resolves to `Ok(None)` without
    /// consulting older segments.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if a segment read fails (I/O,
    /// corruption). A miss is never an error — it is `Ok(None)`.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineError> {
        if self.closed {
            return Err(EngineError::Closed);
        }

        if let Some(entry) = self.mem.get_entry(key) {
            return Ok(entry.as_value().map(<[u8]>::to_vec));
        }

        for segment in self.registry.segments() {
            match segment.lookup(key)? {
                Lookup::Found(value) => return Ok(Some(value)),
                Lookup::FoundTombstone => return Ok(None),
                Lookup::NotFound => continue,
            }
        }

        Ok(None)
    }

    /// Equivalent to `get(key).map(|v| v.is_some())`, but documents the
    /// short-circuit on the first hit explicitly.
    pub fn contains(&self, key: &[u8]) -> Result<bool, EngineError> {
        Ok(self.get(key)?.is_some())
    }
}
