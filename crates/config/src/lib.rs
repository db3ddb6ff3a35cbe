//! # Config
//!
//! Configuration for opening a JumpDB [`Engine`](../engine/struct.Engine.html)
//! instance: the `open` parameters documented by the embedded API, their
//! defaults, and validation.
//!
//! ## Example
//!
//! ```rust
//! use config::EngineOptions;
//!
//! let opts = EngineOptions::new("/tmp/jumpdb-data")
//!     .with_max_inmemory_size(2048)
//!     .with_compaction_threshold(8);
//! assert!(opts.validate().is_ok());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Default entry-count threshold that triggers a memtable flush.
pub const DEFAULT_MAX_INMEMORY_SIZE: usize = 1024;
/// Default sparse-index sampling stride (1-in-`x` entries).
pub const DEFAULT_SPARSE_STRIDE: usize = 100;
/// Default target Bloom filter false-positive rate.
pub const DEFAULT_BLOOM_FP_RATE: f64 = 0.01;
/// Default number of live segments that triggers compaction.
pub const DEFAULT_COMPACTION_THRESHOLD: usize = 4;

/// Errors returned by [`EngineOptions::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_inmemory_size` was zero.
    #[error("max_inmemory_size must be > 0")]
    ZeroMaxInmemorySize,

    /// `sparse_stride` was zero (a stride must be `x >= 1`).
    #[error("sparse_stride must be >= 1")]
    ZeroSparseStride,

    /// `bloom_fp_rate` was not in the open interval `(0, 1)`.
    #[error("bloom_fp_rate must be in (0, 1), got {0}")]
    InvalidBloomFpRate(String),

    /// `compaction_threshold` was zero.
    #[error("compaction_threshold must be > 0")]
    ZeroCompactionThreshold,
}

/// Parameters accepted by `Engine::open`.
///
/// Every field except `segment_dir` has a documented default; use
/// [`EngineOptions::new`] to get those defaults and override individual
/// fields with the `with_*` builder methods.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Directory where segment files (and nothing else) are stored.
    pub segment_dir: PathBuf,

    /// Entry-count threshold that triggers a memtable flush (default 1024).
    pub max_inmemory_size: usize,

    /// If `true`, segment files survive `close()`; if `false`, they are
    /// deleted on close (default `true`).
    pub persist_segments: bool,

    /// Sparse-index sampling stride: every `1-in-x`-th entry is sampled,
    /// plus the first and last entries of every segment (default 100).
    pub sparse_stride: usize,

    /// Target Bloom filter false-positive rate per segment (default 0.01).
    pub bloom_fp_rate: f64,

    /// Number of live segments that triggers compaction (default 4).
    pub compaction_threshold: usize,
}

impl EngineOptions {
    /// Creates an `EngineOptions` with every field at its documented default,
    /// storing segments under `segment_dir`.
    pub fn new<P: Into<PathBuf>>(segment_dir: P) -> Self {
        Self {
            segment_dir: segment_dir.into(),
            max_inmemory_size: DEFAULT_MAX_INMEMORY_SIZE,
            persist_segments: true,
            sparse_stride: DEFAULT_SPARSE_STRIDE,
            bloom_fp_rate: DEFAULT_BLOOM_FP_RATE,
            compaction_threshold: DEFAULT_COMPACTION_THRESHOLD,
        }
    }

    /// Overrides `max_inmemory_size`.
    #[must_use]
    pub fn with_max_inmemory_size(mut self, n: usize) -> Self {
        self.max_inmemory_size = n;
        self
    }

    /// Overrides `persist_segments`.
    #[must_use]
    pub fn with_persist_segments(mut self, persist: bool) -> Self {
        self.persist_segments = persist;
        self
    }

    /// Overrides `sparse_stride`.
    #[must_use]
    pub fn with_sparse_stride(mut self, stride: usize) -> Self {
        self.sparse_stride = stride;
        self
    }

    /// Overrides `bloom_fp_rate`.
    #[must_use]
    pub fn with_bloom_fp_rate(mut self, p: f64) -> Self {
        self.bloom_fp_rate = p;
        self
    }

    /// Overrides `compaction_threshold`.
    #[must_use]
    pub fn with_compaction_threshold(mut self, t: usize) -> Self {
        self.compaction_threshold = t;
        self
    }

    /// Validates every field, returning the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_inmemory_size == 0 {
            return Err(ConfigError::ZeroMaxInmemorySize);
        }
        if self.sparse_stride == 0 {
            return Err(ConfigError::ZeroSparseStride);
        }
        if !(self.bloom_fp_rate > 0.0 && self.bloom_fp_rate < 1.0) {
            return Err(ConfigError::InvalidBloomFpRate(self.bloom_fp_rate.to_string()));
        }
        if self.compaction_threshold == 0 {
            return Err(ConfigError::ZeroCompactionThreshold);
        }
        Ok(())
    }
}
