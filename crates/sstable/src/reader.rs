//! Segment reader: point lookups via Bloom filter → sparse index → bounded
//! linear scan, and a full sequential iterator used by compaction's merge.

use bloom::BloomFilter;
use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::SSTableError;
use crate::format::{read_footer, read_record};
use crate::index::SparseIndex;
use crate::writer::SegmentMeta;

/// The result of a single-segment lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The key was found with a live value.
    Found(Vec<u8>),
    /// The key was found, but shadowed by a tombstone in this segment.
    FoundTombstone,
    /// The key is definitely not in this segment.
    NotFound,
}

/// A handle to an immutable, on-disk segment file.
///
/// Holds the segment's Bloom filter and sparse index in memory alongside an
/// open, `Mutex`-protected file handle for point lookups, plus the byte
/// offset where the DATA section ends (used as a scan bound).
pub struct SSTableReader {
    path: PathBuf,
    file: Mutex<BufReader<File>>,
    bloom: BloomFilter,
    index: SparseIndex,
    entry_count: usize,
    data_end: u64,
}

impl SSTableReader {
    /// Opens a segment file from scratch, rebuilding its sparse index and
    /// Bloom filter with a single linear pass over the DATA section.
    ///
    /// Used during recovery, where no in-memory artifacts from the write
    /// survive a restart.
    pub fn open(
        path: &Path,
        sparse_stride: usize,
        bloom_fp_rate: f64,
    ) -> Result<Self, SSTableError> {
        let mut f = File::open(path)?;
        let filesize = f.metadata()?.len();
        let footer = read_footer(&mut f, filesize)?;

        f.seek(SeekFrom::Start(0))?;
        let mut offsets: Vec<(Vec<u8>, u64)> = Vec::with_capacity(footer.entry_count as usize);
        loop {
            let pos = f.stream_position()?;
            if pos >= footer.bloom_offset {
                break;
            }
            let (key, _value) = read_record(&mut f, pos)?;
            offsets.push((key, pos));
        }

        let mut bloom = BloomFilter::new(offsets.len().max(1), bloom_fp_rate);
        for (key, _) in &offsets {
            bloom.insert(key);
        }

        let index = SparseIndex::sample(&offsets, sparse_stride);
        let entry_count = offsets.len();

        f.seek(SeekFrom::Start(0))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(BufReader::new(f)),
            bloom,
            index,
            entry_count,
            data_end: footer.bloom_offset,
        })
    }

    /// Constructs a reader from the in-memory artifacts the writer just
    /// built, avoiding a redundant rescan of a segment freshly written in
    /// this process.
    pub fn from_parts(path: &Path, meta: SegmentMeta) -> Result<Self, SSTableError> {
        let f = File::open(path)?;
        let filesize = f.metadata()?.len();
        let bloom_section_len = meta.bloom.serialized_size() as u64;
        let data_end = filesize
            .checked_sub(bloom_section_len)
            .and_then(|v| v.checked_sub(crate::format::FOOTER_BYTES))
            .ok_or(SSTableError::Truncated)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(BufReader::new(f)),
            bloom: meta.bloom,
            index: meta.index,
            entry_count: meta.entry_count,
            data_end,
        })
    }

    /// Looks up `key` in this segment: Bloom filter, then sparse index, then
    /// a bounded linear scan (at most one sparse-stride worth of records).
    pub fn lookup(&self, key: &[u8]) -> Result<Lookup, SSTableError> {
        if !self.bloom.may_contain(key) {
            return Ok(Lookup::NotFound);
        }

        let idx = match self.index.floor(key) {
            Some(i) => i,
            None => return Ok(Lookup::NotFound),
        };

        let start = self.index.offset_at(idx);
        let stop = self.index.next_offset(idx).unwrap_or(self.data_end);

        let mut guard = self
            .file
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.seek(SeekFrom::Start(start))?;

        loop {
            let pos = guard.stream_position()?;
            if pos >= stop || pos >= self.data_end {
                break;
            }
            let (rkey, rvalue) = read_record(&mut *guard, pos)?;
            match rkey.as_slice().cmp(key) {
                Ordering::Equal => {
                    return Ok(match rvalue {
                        Some(v) => Lookup::Found(v),
                        None => Lookup::FoundTombstone,
                    });
                }
                Ordering::Greater => break,
                Ordering::Less => continue,
            }
        }

        Ok(Lookup::NotFound)
    }

    /// A full sequential scan over the DATA section, in ascending key
    /// order. Used only by [`crate::merge::MergeIterator`] during
    /// compaction — point lookups should use [`lookup`](Self::lookup).
    pub fn iter(&self) -> Result<SegmentIter, SSTableError> {
        let f = File::open(&self.path)?;
        Ok(SegmentIter {
            reader: BufReader::new(f),
            data_end: self.data_end,
        })
    }

    /// The path to this segment's file on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries (including tombstones) in this segment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entry_count
    }

    /// `true` if the segment has zero entries (never produced in practice —
    /// the writer refuses to emit an empty segment).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Number of sampled keys in the in-memory sparse index.
    #[must_use]
    pub fn sparse_sample_count(&self) -> usize {
        self.index.len()
    }
}

/// A sequential iterator over every `(key, memtable::Entry)` in a segment,
/// in ascending key order.
pub struct SegmentIter {
    reader: BufReader<File>,
    data_end: u64,
}

impl Iterator for SegmentIter {
    type Item = Result<(Vec<u8>, memtable::Entry), SSTableError>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = match self.reader.stream_position() {
            Ok(p) => p,
            Err(e) => return Some(Err(e.into())),
        };
        if pos >= self.data_end {
            return None;
        }
        match read_record(&mut self.reader, pos) {
            Ok((key, Some(value))) => Some(Ok((key, memtable::Entry::Value(value)))),
            Ok((key, None)) => Some(Ok((key, memtable::Entry::Tombstone))),
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;
