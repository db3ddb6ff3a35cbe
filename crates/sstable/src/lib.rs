//! # SSTable - Sorted String Table
//!
//! Immutable, on-disk storage files for the JumpDB storage engine.
//!
//! When the in-memory [`memtable::Memtable`] exceeds its size threshold the
//! engine flushes it to disk as a segment. Segments are *write-once,
//! read-many* — once created they are never modified (only replaced during
//! compaction).
//!
//! ## File layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ DATA SECTION (records, strictly ascending by key)          │
//! │                                                            │
//! │   crc32 (u32) | key_len (u32) | value_len (u32)             │
//! │   key (key_len bytes) | value (value_len bytes, if any)     │
//! │                                                            │
//! │   ... repeated for each entry ...                          │
//! ├──────────────────────────────────────────────────────────┤
//! │ BLOOM SECTION (serialized bloom::BloomFilter)               │
//! ├──────────────────────────────────────────────────────────┤
//! │ FOOTER (fixed 20 bytes, always last)                        │
//! │                                                            │
//! │   entry_count (u64 LE) | bloom_offset (u64 LE) | magic (4B) │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! No sparse index is persisted: it is rebuilt in a single linear pass over
//! the DATA section on open. See [`reader`] and [`format`] for details.

mod error;
mod format;
mod index;
mod merge;
mod reader;
mod writer;

pub use error::SSTableError;
pub use format::{Footer, FOOTER_BYTES, MAX_FIELD_BYTES, SSTABLE_MAGIC, TOMBSTONE_SENTINEL};
pub use index::SparseIndex;
pub use merge::MergeIterator;
pub use reader::{Lookup, SSTableReader, SegmentIter};
pub use writer::{SegmentMeta, SegmentWriter};
