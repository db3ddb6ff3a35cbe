//! # Engine - JumpDB Storage Engine
//!
//! The central orchestrator that ties together the [`memtable`] and
//! [`sstable`] crates into a complete LSM-tree key-value store.
//!
//! ## Architecture
//!
//! ```text
//! Client
//!   |
//!   v
//! ┌───────────────────────────────────────────────┐
//! │                   ENGINE                      │
//! │                                               │
//! │ write.rs → Memtable insert                    │
//! │              |                                │
//! │              |  (entry count >= threshold?)   │
//! │              |            yes                 │
//! │              v                                │
//! │           flush() → new segment, newest-first │
//! │              |                                │
//! │              |  (segment count > T?)          │
//! │              |            yes                 │
//! │              v                                │
//! │           compact() → single merged segment   │
//! │                                               │
//! │ read.rs → Memtable → segments newest-first    │
//! │            (first hit wins)                   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Module responsibilities
//!
//! | Module        | Purpose                                                |
//! |---------------|---------------------------------------------------------|
//! | [`lib.rs`]    | `Engine` struct, `open`/`close`, accessors, `Drop`       |
//! | [`registry`]  | Ordered segment list, recovery scan, tmp-file cleanup    |
//! | [`write`]     | `set()`, `delete()`, `force_flush()`, internal `flush()` |
//! | [`read`]      | `get()`, `contains()`                                    |
//! | [`compaction`]| `compact()`: streaming merge + tombstone reconciliation  |
//!
//! ## Crash safety
//!
//! There is no write-ahead log in this engine — a crash between a `set` and
//! the next flush loses the unflushed writes, by design. Segment
//! files are written atomically via temp file + rename + parent-dir fsync,
//! and an interrupted flush or compaction's leftover `.tmp` file is swept on
//! the next `Engine::open`.

mod compaction;
mod error;
mod read;
mod registry;
mod write;

use config::EngineOptions;
use memtable::Memtable;
use registry::SegmentRegistry;

pub use error::EngineError;

/// Maximum allowed key size in bytes (64 KiB).
pub const MAX_KEY_SIZE: usize = 64 * 1024;
/// Maximum allowed value size in bytes (10 MiB).
pub const MAX_VALUE_SIZE: usize = 10 * 1024 * 1024;

/// The embedded LSM storage engine.
///
/// # Write path
///
/// 1. Validate the key (and value, for `set`).
/// 2. Apply the mutation to the in-memory memtable.
/// 3. If the memtable's entry count now exceeds `max_inmemory_size`, flush
///    it to a new segment, synchronously, before returning.
///
/// # Read path
///
/// 1. Check the memtable (freshest data, includes tombstones).
/// 2. Check segments newest to oldest.
/// 3. First match wins; a tombstone hit resolves to *not found*.
///
/// # Recovery
///
/// On construction ([`Engine::open`]), `segment_dir` is scanned for existing
/// segment files, each one's sparse index and Bloom filter are rebuilt by a
/// single linear pass, and the registry is ordered newest-first by parsing
/// the monotonic id encoded in each filename. The memtable always starts
/// empty — there is no WAL to replay.
pub struct Engine {
    pub(crate) mem: Memtable,
    pub(crate) registry: SegmentRegistry,
    pub(crate) options: EngineOptions,
    pub(crate) degraded: bool,
    pub(crate) closed: bool,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("segment_dir", &self.options.segment_dir)
            .field("max_inmemory_size", &self.options.max_inmemory_size)
            .field("compaction_threshold", &self.options.compaction_threshold)
            .field("memtable_entries", &self.mem.len())
            .field("segment_count", &self.registry.len())
            .field("degraded", &self.degraded)
            .field("closed", &self.closed)
            .finish()
    }
}

impl Engine {
    /// Opens an engine, validating `options` and recovering any existing
    /// segments under `options.segment_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Argument`] if `options` fails validation (see
    /// [`config::EngineOptions::validate`]), or [`EngineError::Io`] if
    /// `segment_dir` cannot be created or scanned.
    pub fn open(options: EngineOptions) -> Result<Self, EngineError> {
        options
            .validate()
            .map_err(|e| EngineError::Argument(e.to_string()))?;

        let registry = SegmentRegistry::open(
            &options.segment_dir,
            options.sparse_stride,
            options.bloom_fp_rate,
        )?;

        Ok(Self {
            mem: Memtable::new(),
            registry,
            options,
            degraded: false,
            closed: false,
        })
    }

    /// Closes the engine: flushes any remaining memtable contents, then, if
    /// `persist_segments` is `false`, deletes every segment file.
    ///
    /// Consumes `self` — there is no operation after `close`.
    pub fn close(mut self) -> Result<(), EngineError> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        if !self.mem.is_empty() {
            self.flush()?;
        }
        if !self.options.persist_segments {
            self.registry.delete_all();
        }
        self.closed = true;
        Ok(())
    }

    /// `true` once a background compaction has failed; while degraded, the
    /// engine only serves reads (see [`EngineError::Degraded`]).
    #[must_use]
    pub fn degraded(&self) -> bool {
        self.degraded
    }

    /// The number of live segments currently registered.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.registry.len()
    }

    /// The number of entries (including tombstones) currently buffered in
    /// the memtable.
    #[must_use]
    pub fn memtable_len(&self) -> usize {
        self.mem.len()
    }

    /// The options this engine was opened with.
    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}

/// Best-effort flush on drop.
///
/// If the engine is dropped without an explicit [`Engine::close`], any data
/// remaining in the memtable is flushed to a segment so it is not silently
/// lost. Errors are ignored because `Drop` cannot propagate them.
impl Drop for Engine {
    fn drop(&mut self) {
        if !self.closed && !self.mem.is_empty() {
            let _ = self.flush();
        }
    }
}
