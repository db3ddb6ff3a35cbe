//! Compaction: merges every live segment into a single new one.
//!
//! Uses [`MergeIterator`] for sorted, deduplicated streaming across
//! segments. Because this is always a *full* compaction — every live
//! segment participates — the result always includes the oldest live
//! segment, so a tombstone is safe to drop unless the memtable (which is
//! not itself part of compaction) still references the key.

use tracing::info;

use crate::error::EngineError;
use crate::Engine;
use sstable::{MergeIterator, SSTableError, SSTableReader, SegmentWriter};

impl Engine {
    /// Compacts all live segments into one.
    ///
    /// A no-op if there is at most one segment (nothing to compact). New
    /// data is written to a temporary file and renamed into place; the
    /// registry is then replaced in a single step, and the superseded
    /// segment files are deleted.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the merge or write fails. On
    /// failure, any partially-written output file is removed and the
    /// registry is left unchanged.
    pub fn compact(&mut self) -> Result<(), EngineError> {
        if self.registry.len() <= 1 {
            return Ok(());
        }

        let estimated_count: usize = self.registry.segments().iter().map(SSTableReader::len).sum();
        let path = self.registry.alloc_path();

        let mem_ref = &self.mem;
        let mut merge = MergeIterator::new(self.registry.segments())?;
        let mut merge_error: Option<SSTableError> = None;

        let stream = std::iter::from_fn(|| loop {
            match merge.next_entry() {
                Ok(Some((key, entry))) => {
                    // Safe to drop a tombstone: this compaction always
                    // includes the oldest live segment, so no segment still
                    // needs it to shadow an older value. The memtable is the
                    // one exception — it isn't part of compaction, so a
                    // tombstone it still references must survive to shadow
                    // the memtable entry on a future flush.
                    if entry.is_tombstone() && !mem_ref.contains_key(&key) {
                        continue;
                    }
                    return Some((key, entry));
                }
                Ok(None) => return None,
                Err(e) => {
                    merge_error = Some(e);
                    return None;
                }
            }
        });

        let write_result = SegmentWriter::write_from_iterator(
            &path,
            estimated_count,
            stream,
            self.options.bloom_fp_rate,
            self.options.sparse_stride,
        );

        if let Some(e) = merge_error {
            let _ = std::fs::remove_file(&path);
            return Err(e.into());
        }

        match write_result {
            Ok(meta) => {
                let reader = SSTableReader::from_parts(&path, meta)?;
                info!(path = %path.display(), entries = reader.len(), "compacted segments");
                self.registry.replace_all(reader);
                Ok(())
            }
            Err(SSTableError::EmptyInput) => {
                // Every live entry was a droppable tombstone: nothing to
                // write, so just retire the inputs.
                self.registry.delete_all();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
