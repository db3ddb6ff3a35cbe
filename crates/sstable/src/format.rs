//! SSTable binary format: record encoding and the trailing footer.
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
//! All integers are little-endian. A tombstone is encoded by
//! `value_len = 0xFFFFFFFF` and the absence of a value payload. The CRC32
//! covers `key_len`, `value_len`, `key`, and `value` (everything in the
//! record after the CRC field itself).
//!
//! No sparse index is persisted: it is rebuilt in a single linear pass over
//! the DATA section on open (see [`crate::reader`]).

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::SSTableError;

/// Sentinel `value_len` marking a tombstone record.
pub const TOMBSTONE_SENTINEL: u32 = 0xFFFF_FFFF;

/// Magic bytes identifying a JumpDB segment file, written as the last four
/// bytes of the footer.
pub const SSTABLE_MAGIC: [u8; 4] = *b"JMP1";

/// Size of the footer in bytes: `entry_count(8) + bloom_offset(8) + magic(4)`.
pub const FOOTER_BYTES: u64 = 8 + 8 + 4;

/// Sanity cap on `key_len`/`value_len` while decoding, to avoid allocating
/// gigabytes for a corrupt length field.
pub const MAX_FIELD_BYTES: u32 = 64 * 1024 * 1024;

/// The parsed footer of a segment file.
#[derive(Debug, Clone, Copy)]
pub struct Footer {
    /// Number of entries in the DATA section.
    pub entry_count: u64,
    /// Byte offset where the BLOOM section starts (== end of DATA section).
    pub bloom_offset: u64,
}

/// Writes the 20-byte footer: `entry_count | bloom_offset | magic`.
pub fn write_footer<W: Write>(
    w: &mut W,
    entry_count: u64,
    bloom_offset: u64,
) -> Result<(), SSTableError> {
    w.write_u64::<LittleEndian>(entry_count)?;
    w.write_u64::<LittleEndian>(bloom_offset)?;
    w.write_all(&SSTABLE_MAGIC)?;
    Ok(())
}

/// Reads and validates the footer at the end of a segment file.
///
/// Seeks to `filesize - FOOTER_BYTES` and reads forward. Returns
/// [`SSTableError::Truncated`] if the file is smaller than a footer, and
/// [`SSTableError::BadMagic`] if the trailing four bytes don't match
/// [`SSTABLE_MAGIC`].
pub fn read_footer<R: Read + Seek>(r: &mut R, filesize: u64) -> Result<Footer, SSTableError> {
    if filesize < FOOTER_BYTES {
        return Err(SSTableError::Truncated);
    }
    r.seek(SeekFrom::Start(filesize - FOOTER_BYTES))?;
    let entry_count = r.read_u64::<LittleEndian>()?;
    let bloom_offset = r.read_u64::<LittleEndian>()?;
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != SSTABLE_MAGIC {
        return Err(SSTableError::BadMagic);
    }
    if bloom_offset > filesize - FOOTER_BYTES {
        return Err(SSTableError::Truncated);
    }
    Ok(Footer {
        entry_count,
        bloom_offset,
    })
}

/// Computes the CRC32 of a record body: `key_len | value_len | key | value`.
fn record_crc(key: &[u8], value: Option<&[u8]>) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&(key.len() as u32).to_le_bytes());
    let value_len = value.map(|v| v.len() as u32).unwrap_or(TOMBSTONE_SENTINEL);
    hasher.update(&value_len.to_le_bytes());
    hasher.update(key);
    if let Some(v) = value {
        hasher.update(v);
    }
    hasher.finalize()
}

/// Writes one record (`crc32 | key_len | value_len | key | value?`) and
/// returns the number of bytes written.
pub fn write_record<W: Write>(
    w: &mut W,
    key: &[u8],
    value: Option<&[u8]>,
) -> Result<u64, SSTableError> {
    let crc = record_crc(key, value);
    let value_len = value.map(|v| v.len() as u32).unwrap_or(TOMBSTONE_SENTINEL);

    w.write_u32::<LittleEndian>(crc)?;
    w.write_u32::<LittleEndian>(key.len() as u32)?;
    w.write_u32::<LittleEndian>(value_len)?;
    w.write_all(key)?;
    if let Some(v) = value {
        w.write_all(v)?;
    }

    Ok(4 + 4 + 4 + key.len() as u64 + value.map(|v| v.len() as u64).unwrap_or(0))
}

/// Reads one record at the reader's current position, verifying its CRC32.
///
/// Returns `(key, value)` where `value` is `None` for a tombstone. `offset`
/// is only used to point a [`SSTableError::Checksum`] error at the right
/// spot in the file.
pub fn read_record<R: Read>(
    r: &mut R,
    offset: u64,
) -> Result<(Vec<u8>, Option<Vec<u8>>), SSTableError> {
    let stored_crc = r.read_u32::<LittleEndian>()?;
    let key_len = r.read_u32::<LittleEndian>()?;
    if key_len > MAX_FIELD_BYTES {
        return Err(SSTableError::RecordTooLarge("key_len"));
    }
    let value_len = r.read_u32::<LittleEndian>()?;
    if value_len != TOMBSTONE_SENTINEL && value_len > MAX_FIELD_BYTES {
        return Err(SSTableError::RecordTooLarge("value_len"));
    }

    let mut key = vec![0u8; key_len as usize];
    r.read_exact(&mut key)?;

    let value = if value_len == TOMBSTONE_SENTINEL {
        None
    } else {
        let mut v = vec![0u8; value_len as usize];
        r.read_exact(&mut v)?;
        Some(v)
    };

    let actual_crc = record_crc(&key, value.as_deref());
    if actual_crc != stored_crc {
        return Err(SSTableError::Checksum {
            offset,
            expected: stored_crc,
            actual: actual_crc,
        });
    }

    Ok((key, value))
}
