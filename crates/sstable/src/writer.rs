//! Segment writer: serializes an ordered key stream to an immutable segment
//! file and builds its sparse index and Bloom filter in memory as it goes.

use bloom::BloomFilter;
use memtable::{Entry, Memtable};
use std::fs::{rename, OpenOptions};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use crate::error::SSTableError;
use crate::format::write_footer;
use crate::index::SparseIndex;

/// In-memory artifacts produced alongside a freshly written segment file.
///
/// Passing these straight to [`crate::reader::SSTableReader::from_parts`]
/// avoids rescanning a segment the engine just wrote.
pub struct SegmentMeta {
    /// The sparse index sampled while writing.
    pub index: SparseIndex,
    /// The populated Bloom filter.
    pub bloom: BloomFilter,
    /// Number of entries written (including tombstones).
    pub entry_count: usize,
}

/// Writes an ordered key stream to a new segment file.
///
/// All work happens inside the two entry points: [`SegmentWriter::write_from_memtable`]
/// for a flush, [`SegmentWriter::write_from_iterator`] for compaction's
/// streaming merge output.
pub struct SegmentWriter;

impl SegmentWriter {
    /// Flushes `mem` to a new segment at `path`.
    ///
    /// `mem` must be non-empty; flushing an empty memtable is a logic error
    /// upstream (the engine only calls this when there is something to
    /// flush).
    pub fn write_from_memtable(
        path: &Path,
        mem: &Memtable,
        bloom_fp_rate: f64,
        sparse_stride: usize,
    ) -> Result<SegmentMeta, SSTableError> {
        let iter = mem.iter().map(|(k, v)| (k.to_vec(), v.clone()));
        Self::write_internal(path, mem.len().max(1), iter, bloom_fp_rate, sparse_stride)
    }

    /// Writes a segment from any iterator of `(key, Entry)` pairs in
    /// strictly ascending key order, as produced by
    /// [`crate::merge::MergeIterator`] during compaction.
    ///
    /// `expected_count` sizes the Bloom filter; over-estimating is safe,
    /// under-estimating only raises the false-positive rate.
    pub fn write_from_iterator<I>(
        path: &Path,
        expected_count: usize,
        iter: I,
        bloom_fp_rate: f64,
        sparse_stride: usize,
    ) -> Result<SegmentMeta, SSTableError>
    where
        I: Iterator<Item = (Vec<u8>, Entry)>,
    {
        Self::write_internal(path, expected_count.max(1), iter, bloom_fp_rate, sparse_stride)
    }

    fn write_internal<I>(
        path: &Path,
        expected_count: usize,
        iter: I,
        bloom_fp_rate: f64,
        sparse_stride: usize,
    ) -> Result<SegmentMeta, SSTableError>
    where
        I: Iterator<Item = (Vec<u8>, Entry)>,
    {
        let tmp_path = tmp_path_for(path);
        let raw_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut file = BufWriter::new(raw_file);

        let mut offsets: Vec<(Vec<u8>, u64)> = Vec::new();
        let mut bloom = BloomFilter::new(expected_count, bloom_fp_rate);

        for (key, entry) in iter {
            let offset = file.stream_position()?;
            let value = entry.as_value();
            crate::format::write_record(&mut file, &key, value)?;
            bloom.insert(&key);
            offsets.push((key, offset));
        }

        if offsets.is_empty() {
            drop(file);
            let _ = std::fs::remove_file(&tmp_path);
            return Err(SSTableError::EmptyInput);
        }

        let bloom_offset = file.stream_position()?;
        bloom.write_to(&mut file)?;

        write_footer(&mut file, offsets.len() as u64, bloom_offset)?;

        file.flush()?;
        file.into_inner()
            .map_err(|e| SSTableError::Io(e.into_error()))?
            .sync_all()?;

        rename(&tmp_path, path)?;
        fsync_parent(path);

        let index = SparseIndex::sample(&offsets, sparse_stride);

        Ok(SegmentMeta {
            index,
            bloom,
            entry_count: offsets.len(),
        })
    }
}

/// The temporary path a segment is written to before being atomically
/// renamed into place: `<path>.tmp`.
pub(crate) fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".tmp");
    std::path::PathBuf::from(s)
}

/// Best-effort fsync of the parent directory so the rename itself is
/// durable (ext4/XFS do not journal directory entry updates implicitly).
fn fsync_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Ok(dir) = std::fs::File::open(parent) {
            let _ = dir.sync_all();
        }
    }
}

#[cfg(test)]
#[path = "tests/writer_tests.rs"]
mod tests;
