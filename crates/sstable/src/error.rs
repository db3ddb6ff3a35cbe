use thiserror::Error;

/// Errors returned by the segment writer and reader.
#[derive(Debug, Error)]
pub enum SSTableError {
    /// An underlying I/O error (open, read, write, seek, rename).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A record's stored CRC32 did not match the bytes actually read back.
    #[error("checksum mismatch at offset {offset}: expected {expected:#010x}, got {actual:#010x}")]
    Checksum {
        /// Byte offset of the start of the corrupt record.
        offset: u64,
        /// CRC stored in the record.
        expected: u32,
        /// CRC recomputed from the bytes actually read.
        actual: u32,
    },

    /// The file's footer magic did not match [`crate::format::SSTABLE_MAGIC`].
    #[error("bad magic in segment footer")]
    BadMagic,

    /// The file is smaller than a footer, or a section offset points past
    /// the end of the file.
    #[error("truncated or malformed segment file")]
    Truncated,

    /// A `key_len` or `value_len` field exceeded the sanity cap, almost
    /// certainly indicating a corrupt file rather than a legitimately large
    /// record.
    #[error("corrupt record: {0} exceeds the maximum allowed size")]
    RecordTooLarge(&'static str),

    /// The writer was asked to emit a segment with zero entries.
    #[error("refusing to write a segment with no entries")]
    EmptyInput,
}
