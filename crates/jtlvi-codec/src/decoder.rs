use bytes::Bytes;

use crate::checksum::checksum_with_zeroed_field;
use crate::error::{DecodeError, DecodeResult};
use crate::layout::{RecordInfo, CHECKSUM_RANGE, HEADER_SIZE, MAGIC, RECORD_HEADER_SIZE, TRAILER_TAG};
use crate::pair::Pair;

/// How the record walk finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanEnd {
    /// Input ran out on a record boundary with no trailer.
    Exhausted,
    /// A trailer tag was found at `offset`.
    Trailer { offset: usize },
}

#[derive(Debug)]
pub(crate) struct Scan {
    pub checksum: u16,
    pub records: Vec<RecordInfo>,
    pub end: ScanEnd,
}

/// Validate the header and walk every record up to the trailer or end of
/// input.
pub(crate) fn scan(src: &[u8]) -> DecodeResult<Scan> {
    if src.len() < HEADER_SIZE {
        return Err(DecodeError::TooShort { len: src.len() });
    }
    if src[0..2] != MAGIC {
        return Err(DecodeError::BadMagic {
            seen: [src[0], src[1]],
        });
    }

    let stored = read_u16(src, CHECKSUM_RANGE.start);
    let calculated = checksum_with_zeroed_field(src);
    if calculated != stored {
        return Err(DecodeError::ChecksumMismatch { calculated, stored });
    }

    let mut records = Vec::new();
    let mut offset = HEADER_SIZE;
    while offset < src.len() {
        if src.len() - offset < RECORD_HEADER_SIZE {
            return Err(DecodeError::TruncatedHeader { offset });
        }

        let tag = read_u16(src, offset);
        if tag == TRAILER_TAG {
            return Ok(Scan {
                checksum: stored,
                records,
                end: ScanEnd::Trailer { offset },
            });
        }

        let len = usize::from(read_u16(src, offset + 2));
        let available = src.len() - offset - RECORD_HEADER_SIZE;
        if len > available {
            return Err(DecodeError::TruncatedValue {
                offset,
                tag,
                declared: len,
                available,
            });
        }

        records.push(RecordInfo { offset, tag, len });
        offset += RECORD_HEADER_SIZE + len;
    }

    Ok(Scan {
        checksum: stored,
        records,
        end: ScanEnd::Exhausted,
    })
}

/// Decode a message into its pairs, in wire order.
///
/// Duplicate tags are returned as separate pairs. Collecting the result into
/// a map keeps only one value per tag; callers that need every occurrence
/// must work with the list.
///
/// Bytes after a trailer are never examined. On any error nothing is
/// returned.
pub fn decode(src: &[u8]) -> DecodeResult<Vec<Pair>> {
    let scanned = scan(src)?;
    tracing::trace!(
        records = scanned.records.len(),
        len = src.len(),
        trailer = matches!(scanned.end, ScanEnd::Trailer { .. }),
        "decoded message"
    );
    Ok(scanned
        .records
        .iter()
        .map(|record| Pair {
            tag: record.tag,
            value: Bytes::copy_from_slice(&src[record.value_range()]),
        })
        .collect())
}

/// Decode a message held in a shared buffer.
///
/// Values are zero-copy slices of `src`.
pub fn decode_bytes(src: Bytes) -> DecodeResult<Vec<Pair>> {
    let scanned = scan(&src)?;
    Ok(scanned
        .records
        .iter()
        .map(|record| Pair {
            tag: record.tag,
            value: src.slice(record.value_range()),
        })
        .collect())
}

fn read_u16(src: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([src[offset], src[offset + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{encode, EncodeOptions};

    #[test]
    fn empty_message() {
        assert!(decode(b"\xd4\x0e\x80\x61\xff\xff\x00\x00").unwrap().is_empty());
    }

    #[test]
    fn sorted_records() {
        let pairs =
            decode(b"\xd4\x0e\xef\x7f\x00\x01\x00\x03foo\x00\x02\x00\x03bar\xff\xff\x00\x00")
                .unwrap();
        assert_eq!(
            pairs,
            vec![Pair::new(1, &b"foo"[..]), Pair::new(2, &b"bar"[..])]
        );
    }

    #[test]
    fn unsorted_records() {
        let pairs =
            decode(b"\xd4\x0e\x3e\x61\x00\x02\x00\x03bar\x00\x01\x00\x03foo\xff\xff\x00\x00")
                .unwrap();
        assert_eq!(
            pairs,
            vec![Pair::new(2, &b"bar"[..]), Pair::new(1, &b"foo"[..])]
        );
    }

    #[test]
    fn header_only_message() {
        assert!(decode(b"\xd4\x0e\x00\x1e").unwrap().is_empty());
    }

    #[test]
    fn padded_message() {
        let mut msg = b"\xd4\x0e\xad\xb3\xff\xff\x00\x00".to_vec();
        for _ in 0..12 {
            msg.extend_from_slice(b"\xf0\x0f");
        }
        assert!(decode(&msg).unwrap().is_empty());
    }

    #[test]
    fn too_short() {
        assert_eq!(
            decode(b"\xd4\x0e").unwrap_err(),
            DecodeError::TooShort { len: 2 }
        );
        assert_eq!(decode(b"").unwrap_err(), DecodeError::TooShort { len: 0 });
    }

    #[test]
    fn bad_magic() {
        let err = decode(b"\xff\xff\x80\x61\xff\xff\x00\x00").unwrap_err();
        assert_eq!(err, DecodeError::BadMagic { seen: [0xFF, 0xFF] });
        assert!(err.to_string().contains("ffff"));
    }

    #[test]
    fn checksum_mismatch() {
        let err = decode(b"\xd4\x0e\xff\xff\xff\xff\x00\x00").unwrap_err();
        assert_eq!(
            err,
            DecodeError::ChecksumMismatch {
                calculated: 32865,
                stored: 65535
            }
        );
        assert_eq!(
            err.to_string(),
            "incorrect checksum (calculated 32865, saw 65535)"
        );
    }

    #[test]
    fn truncated_tag_and_length() {
        let err = decode(b"\xd4\x0e\x80\x08\x00\x01").unwrap_err();
        assert_eq!(err, DecodeError::TruncatedHeader { offset: 4 });
    }

    #[test]
    fn truncated_value() {
        let err = decode(b"\xd4\x0e\x28\x60\x00\x01\xff\xff\x00\x00").unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedValue {
                offset: 4,
                tag: 1,
                declared: 65535,
                available: 2,
            }
        );
    }

    #[test]
    fn trailer_short_circuits_following_records() {
        let mut msg = b"\xd4\x0e\x00\x00\x00\x01\x00\x01a\xff\xff\x00\x00".to_vec();
        // A valid-looking record after the trailer must be ignored.
        msg.extend_from_slice(b"\x00\x02\x00\x01b");
        let checksum = checksum_with_zeroed_field(&msg);
        msg[2..4].copy_from_slice(&checksum.to_be_bytes());

        assert_eq!(decode(&msg).unwrap(), vec![Pair::new(1, &b"a"[..])]);
    }

    #[test]
    fn trailer_with_nonzero_length_is_accepted() {
        let mut msg = b"\xd4\x0e\x00\x00\xff\xff\x12\x34".to_vec();
        let checksum = checksum_with_zeroed_field(&msg);
        msg[2..4].copy_from_slice(&checksum.to_be_bytes());

        assert!(decode(&msg).unwrap().is_empty());
    }

    #[test]
    fn empty_value_record() {
        let msg = encode(vec![(9u16, Bytes::new())], &EncodeOptions::default()).unwrap();
        assert_eq!(decode(&msg).unwrap(), vec![Pair::new(9, Bytes::new())]);
    }

    #[test]
    fn decode_bytes_slices_input() {
        let msg = encode(
            vec![(1u16, &b"hello"[..]), (2u16, &b"world"[..])],
            &EncodeOptions::default(),
        )
        .unwrap();
        let pairs = decode_bytes(msg.clone()).unwrap();

        assert_eq!(pairs[0].value.as_ref(), b"hello");
        assert_eq!(pairs[1].value.as_ref(), b"world");
        assert_eq!(pairs[0].value.as_ptr(), msg[8..].as_ptr());
    }

    #[test]
    fn tampered_byte_detected() {
        let msg = encode(
            vec![(1u16, &b"foo"[..]), (2u16, &b"bar"[..])],
            &EncodeOptions::default(),
        )
        .unwrap();
        let mut tampered = msg.to_vec();
        tampered[9] ^= 0x01;

        assert!(matches!(
            decode(&tampered),
            Err(DecodeError::ChecksumMismatch { .. })
        ));
    }
}
