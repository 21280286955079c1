use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::checksum_with_zeroed_field;
use crate::error::{EncodeError, EncodeResult};
use crate::layout::{
    CHECKSUM_RANGE, HEADER_SIZE, MAGIC, MAX_PADDED_LENGTH, MAX_VALUE_LEN, RECORD_HEADER_SIZE,
    TRAILER, TRAILER_TAG,
};
use crate::pair::{Pair, PairSource};

/// Options controlling how a message is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Stable-sort pairs by ascending tag before encoding. Default: true.
    pub sort: bool,
    /// Append the end-of-message trailer. Default: true.
    ///
    /// Forced on when padding is needed.
    pub trailer: bool,
    /// Minimum total message length; 0 disables padding. Default: 0.
    ///
    /// At most [`MAX_PADDED_LENGTH`].
    pub padded_length: usize,
    /// Pattern repeated to fill padding. Must be non-empty. Default: `[0x00]`.
    pub padding: Bytes,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            sort: true,
            trailer: true,
            padded_length: 0,
            padding: Bytes::from_static(&[0x00]),
        }
    }
}

impl EncodeOptions {
    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn trailer(mut self, trailer: bool) -> Self {
        self.trailer = trailer;
        self
    }

    pub fn padded_length(mut self, padded_length: usize) -> Self {
        self.padded_length = padded_length;
        self
    }

    pub fn padding(mut self, padding: impl Into<Bytes>) -> Self {
        self.padding = padding.into();
        self
    }
}

/// Encode pairs into a complete message.
///
/// Validation runs over every pair before any byte is written, so an error
/// never leaves a partially built message behind.
///
/// ```
/// use jtlvi_codec::{encode, EncodeOptions};
///
/// let msg = encode(vec![(1u16, &b"foo"[..])], &EncodeOptions::default()).unwrap();
/// assert_eq!(&msg[..2], &[0xD4, 0x0E]);
/// ```
pub fn encode(source: impl Into<PairSource>, options: &EncodeOptions) -> EncodeResult<Bytes> {
    if options.padding.is_empty() {
        return Err(EncodeError::EmptyPadding);
    }
    if options.padded_length > MAX_PADDED_LENGTH {
        return Err(EncodeError::PaddingTooLarge {
            padded_length: options.padded_length,
            max: MAX_PADDED_LENGTH,
        });
    }

    let mut pairs = source.into().into_pairs();
    for pair in &pairs {
        validate_pair(pair)?;
    }
    if options.sort {
        // `sort_by_key` is stable: duplicate tags keep their input order.
        pairs.sort_by_key(|pair| pair.tag);
    }

    let records_len: usize = pairs.iter().map(Pair::wire_size).sum();
    let mut dst = BytesMut::with_capacity(HEADER_SIZE + records_len + TRAILER.len());

    dst.put_slice(&MAGIC);
    dst.put_u16(0);
    for pair in &pairs {
        encode_record(pair, &mut dst);
    }

    let needs_padding = options.padded_length > 0 && dst.len() < options.padded_length;
    if options.trailer || needs_padding {
        dst.put_slice(&TRAILER);
    }
    if dst.len() < options.padded_length {
        let remaining = options.padded_length - dst.len();
        put_padding(&options.padding, remaining, &mut dst);
    }

    let checksum = checksum_with_zeroed_field(&dst);
    dst[CHECKSUM_RANGE].copy_from_slice(&checksum.to_be_bytes());

    tracing::trace!(
        records = pairs.len(),
        len = dst.len(),
        checksum,
        "encoded message"
    );
    Ok(dst.freeze())
}

fn validate_pair(pair: &Pair) -> EncodeResult<()> {
    if pair.tag == TRAILER_TAG {
        return Err(EncodeError::ReservedTag { tag: pair.tag });
    }
    if pair.value.len() > MAX_VALUE_LEN {
        return Err(EncodeError::ValueTooLong {
            tag: pair.tag,
            len: pair.value.len(),
            max: MAX_VALUE_LEN,
        });
    }
    Ok(())
}

/// Append one record: tag (2B BE), length (2B BE), value.
fn encode_record(pair: &Pair, dst: &mut BytesMut) {
    dst.reserve(RECORD_HEADER_SIZE + pair.value.len());
    dst.put_u16(pair.tag);
    dst.put_u16(pair.value.len() as u16);
    dst.put_slice(&pair.value);
}

/// Append exactly `remaining` bytes of the repeating `pattern`.
fn put_padding(pattern: &[u8], remaining: usize, dst: &mut BytesMut) {
    dst.reserve(remaining);
    dst.extend(pattern.iter().copied().cycle().take(remaining));
}
