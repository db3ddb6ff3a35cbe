//! The segment registry: the ordered, newest-first list of live on-disk
//! segments.
//!
//! Segment identity lives entirely in the filename
//! (`segment-<monotonic-id>.sst`); there is no separate manifest file.
//! Recovery rebuilds the registry by scanning `segment_dir`, parsing each
//! file's id, and ordering newest-first (highest id first).

use std::fs;
use std::path::{Path, PathBuf};

use sstable::SSTableReader;
use tracing::warn;

use crate::error::EngineError;

const SEGMENT_PREFIX: &str = "segment-";
const SEGMENT_SUFFIX: &str = ".sst";

pub struct SegmentRegistry {
    dir: PathBuf,
    segments: Vec<SSTableReader>,
    next_id: u64,
}

impl SegmentRegistry {
    /// Scans `dir` for existing segment files, sweeps leftover `.tmp` files
    /// from an interrupted flush or compaction, and rebuilds the registry
    /// newest-first.
    ///
    /// A segment that fails to open (corruption, truncation) is skipped
    /// rather than aborting recovery — the rest of the registry still
    /// serves.
    pub fn open(dir: &Path, sparse_stride: usize, bloom_fp_rate: f64) -> Result<Self, EngineError> {
        fs::create_dir_all(dir)?;
        Self::cleanup_tmp_files(dir);

        let mut found: Vec<(u64, PathBuf)> = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter_map(|p| parse_segment_id(&p).map(|id| (id, p)))
            .collect();
        found.sort_by(|a, b| b.0.cmp(&a.0));

        let mut segments = Vec::with_capacity(found.len());
        let mut next_id = 0u64;
        for (id, path) in found {
            next_id = next_id.max(id + 1);
            match SSTableReader::open(&path, sparse_stride, bloom_fp_rate) {
                Ok(reader) => segments.push(reader),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable segment during recovery"),
            }
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            segments,
            next_id,
        })
    }

    fn cleanup_tmp_files(dir: &Path) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let p = entry.path();
                if p.extension().and_then(|e| e.to_str()) == Some("tmp") {
                    let _ = fs::remove_file(&p);
                }
            }
        }
    }

    /// Allocates the path for a new segment file, without registering it.
    pub fn alloc_path(&mut self) -> PathBuf {
        let id = self.next_id;
        self.next_id += 1;
        self.dir.join(format!("{SEGMENT_PREFIX}{id:020}{SEGMENT_SUFFIX}"))
    }

    /// Registers a freshly-written segment at the head (newest) of the
    /// registry.
    pub fn register_newest(&mut self, reader: SSTableReader) {
        self.segments.insert(0, reader);
    }

    /// Replaces every registered segment with a single compacted one,
    /// deleting the superseded files.
    pub fn replace_all(&mut self, reader: SSTableReader) {
        let old = std::mem::replace(&mut self.segments, vec![reader]);
        for seg in old {
            let _ = fs::remove_file(seg.path());
        }
    }

    /// The live segments, newest first.
    pub fn segments(&self) -> &[SSTableReader] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Deletes every segment file on disk. Used by `Engine::close` when
    /// `persist_segments == false`.
    pub fn delete_all(&mut self) {
        for seg in self.segments.drain(..) {
            let _ = fs::remove_file(seg.path());
        }
    }
}

fn parse_segment_id(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_prefix(SEGMENT_PREFIX)?.strip_suffix(SEGMENT_SUFFIX)?;
    stem.parse::<u64>().ok()
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
