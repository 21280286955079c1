//! Wire-format constants and message layout inspection.
//!
//! ```text
//! ┌────────────┬──────────────┬──────────────────┬────────────────┬──────────┐
//! │ Magic (2B) │ Checksum     │ Records          │ Trailer        │ Padding  │
//! │ 0xD4 0x0E  │ (2B BE)      │ tag|len|value ...│ 0xFFFF 0x0000  │ filler   │
//! └────────────┴──────────────┴──────────────────┴────────────────┴──────────┘
//! ```

use std::ops::Range;

use crate::decoder::{scan, ScanEnd};
use crate::error::DecodeResult;

/// Message header: magic (2) + checksum (2).
pub const HEADER_SIZE: usize = 4;

/// Record header: tag (2) + length (2).
pub const RECORD_HEADER_SIZE: usize = 4;

/// Magic bytes: 0xD4 0x0E.
pub const MAGIC: [u8; 2] = [0xD4, 0x0E];

/// Byte range of the checksum field within the header.
pub const CHECKSUM_RANGE: Range<usize> = 2..4;

/// Reserved tag marking explicit end-of-message.
pub const TRAILER_TAG: u16 = 0xFFFF;

/// Highest tag usable for data records.
pub const MAX_TAG: u16 = TRAILER_TAG - 1;

/// Largest value a record can carry.
pub const MAX_VALUE_LEN: usize = u16::MAX as usize;

/// Largest `padded_length` the encoder accepts: 16 MiB, the default read
/// limit of [`crate::read_message`].
pub const MAX_PADDED_LENGTH: usize = 16 * 1024 * 1024;

/// The trailer record as written by the encoder.
pub const TRAILER: [u8; 4] = [0xFF, 0xFF, 0x00, 0x00];

/// Position of one data record inside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordInfo {
    /// Offset of the record's tag field.
    pub offset: usize,
    pub tag: u16,
    /// Declared (and verified) value length.
    pub len: usize,
}

impl RecordInfo {
    /// Byte range of the value within the message.
    pub fn value_range(&self) -> Range<usize> {
        let start = self.offset + RECORD_HEADER_SIZE;
        start..start + self.len
    }
}

/// Structural summary of a valid message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLayout {
    /// Total message size in bytes.
    pub total_len: usize,
    /// Checksum stored in (and verified against) the header.
    pub checksum: u16,
    /// Data records in wire order.
    pub records: Vec<RecordInfo>,
    /// Offset of the trailer, if the message has one.
    pub trailer_offset: Option<usize>,
    /// Bytes after the trailer that were never interpreted.
    pub trailing_len: usize,
}

impl MessageLayout {
    pub fn has_trailer(&self) -> bool {
        self.trailer_offset.is_some()
    }
}

/// Validate a message and describe where everything lives in it.
///
/// Applies exactly the checks [`crate::decode`] applies, so a message that
/// inspects cleanly also decodes cleanly.
pub fn inspect(src: &[u8]) -> DecodeResult<MessageLayout> {
    let scanned = scan(src)?;
    let (trailer_offset, trailing_len) = match scanned.end {
        ScanEnd::Exhausted => (None, 0),
        ScanEnd::Trailer { offset } => (Some(offset), src.len() - offset - RECORD_HEADER_SIZE),
    };
    Ok(MessageLayout {
        total_len: src.len(),
        checksum: scanned.checksum,
        records: scanned.records,
        trailer_offset,
        trailing_len,
    })
}
