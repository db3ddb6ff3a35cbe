//! Write path: `set()`, `delete()`, `force_flush()`, and the internal
//! `flush()`.
//!
//! Every mutation is applied to the in-memory memtable first. When the
//! memtable's entry count exceeds the configured `max_inmemory_size`, it is
//! frozen and persisted to a new segment on the calling thread before the
//! call returns.

use tracing::{debug, info};

use crate::error::EngineError;
use crate::{Engine, MAX_KEY_SIZE, MAX_VALUE_SIZE};
use sstable::{SSTableReader, SegmentWriter};

impl Engine {
    /// Inserts or overwrites `key → value`.
    ///
    /// A subsequent `get(key)` returns `value` until a later `set`/`delete`
    /// intervenes. May trigger a synchronous flush (and, transitively,
    /// compaction) if the memtable crosses its size bound.
    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), EngineError> {
        self.check_writable()?;
        validate_key(&key)?;
        if value.len() > MAX_VALUE_SIZE {
            return Err(EngineError::Argument(format!(
                "value too large: {} bytes (max {MAX_VALUE_SIZE})",
                value.len()
            )));
        }

        self.mem.put(key, value);
        self.maybe_flush()
    }

    /// Records a tombstone for `key`.
    ///
    /// Not an error to delete an absent key — the tombstone is recorded
    /// regardless, since an older segment may still hold a value for it.
    pub fn delete(&mut self, key: Vec<u8>) -> Result<(), EngineError> {
        self.check_writable()?;
        validate_key(&key)?;

        self.mem.delete(key);
        self.maybe_flush()
    }

    /// Forces a flush of the current memtable, even if it is below the
    /// configured threshold. A no-op if the memtable is empty.
    pub fn force_flush(&mut self) -> Result<(), EngineError> {
        self.check_writable()?;
        if self.mem.is_empty() {
            return Ok(());
        }
        self.flush()
    }

    fn maybe_flush(&mut self) -> Result<(), EngineError> {
        if self.mem.len() >= self.options.max_inmemory_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Freezes the memtable, writes it to a new segment, and registers the
    /// segment at the head of the registry. Triggers compaction if the
    /// segment count now exceeds `compaction_threshold`.
    pub(crate) fn flush(&mut self) -> Result<(), EngineError> {
        let frozen = std::mem::take(&mut self.mem);
        debug!(entries = frozen.len(), "flushing memtable");

        let path = self.registry.alloc_path();
        let meta = SegmentWriter::write_from_memtable(
            &path,
            &frozen,
            self.options.bloom_fp_rate,
            self.options.sparse_stride,
        )?;
        let reader = SSTableReader::from_parts(&path, meta)?;
        info!(path = %path.display(), entries = reader.len(), "flushed memtable to segment");
        self.registry.register_newest(reader);

        if self.registry.len() > self.options.compaction_threshold {
            if let Err(e) = self.compact() {
                self.degraded = true;
                return Err(e);
            }
        }

        Ok(())
    }

    pub(crate) fn check_writable(&self) -> Result<(), EngineError> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        if self.degraded {
            return Err(EngineError::Degraded);
        }
        Ok(())
    }
}

fn validate_key(key: &[u8]) -> Result<(), EngineError> {
    if key.is_empty() {
        return Err(EngineError::Argument("key must not be empty".into()));
    }
    if key.len() > MAX_KEY_SIZE {
        return Err(EngineError::Argument(format!(
            "key too large: {} bytes (max {MAX_KEY_SIZE})",
            key.len()
        )));
    }
    Ok(())
}
