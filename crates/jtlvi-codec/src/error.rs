/// Errors that can occur while building a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The pair collection is neither a sequence of pairs nor a mapping.
    #[error("input must be a mapping or a sequence of [tag, value] pairs, not {observed}")]
    InvalidContainer { observed: &'static str },

    /// A sequence element is not a two-element `[tag, value]` pair.
    #[error("element {index} must be a [tag, value] pair, not {observed}")]
    InvalidPair {
        index: usize,
        observed: &'static str,
    },

    /// A tag is not an integer.
    #[error("tag {tag} must be an integer")]
    NonIntegerTag { tag: String },

    /// A tag is an integer outside the 16-bit range.
    #[error("tag {tag} must be between 0 and 65534, inclusive")]
    TagOutOfRange { tag: i128 },

    /// A tag uses the value reserved for the end-of-message sentinel.
    #[error("tag {tag} is reserved for the end-of-message trailer")]
    ReservedTag { tag: u16 },

    /// A value is not a byte sequence.
    #[error("value for tag {tag} must be a byte sequence, not {observed}")]
    ValueNotBytes { tag: u16, observed: &'static str },

    /// A value does not fit in the 16-bit length field.
    #[error("value for tag {tag} is {len} bytes (max {max})")]
    ValueTooLong { tag: u16, len: usize, max: usize },

    /// The requested padded length exceeds what the encoder will allocate.
    #[error("padded length {padded_length} is too large (max {max})")]
    PaddingTooLarge { padded_length: usize, max: usize },

    /// The padding pattern is empty.
    #[error("padding pattern must contain at least one byte")]
    EmptyPadding,
}

/// Errors that can occur while parsing a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input cannot hold the 4-byte header.
    #[error("incorrect input length {len} (need at least 4 bytes)")]
    TooShort { len: usize },

    /// The first two bytes are not the format magic.
    #[error("unknown magic number {:02x}{:02x} (expected d40e)", seen[0], seen[1])]
    BadMagic { seen: [u8; 2] },

    /// The stored checksum does not match the message contents.
    #[error("incorrect checksum (calculated {calculated}, saw {stored})")]
    ChecksumMismatch { calculated: u16, stored: u16 },

    /// Fewer than 4 bytes remain where a tag and length were expected.
    #[error("position {offset}: attempted to read tag+length past end of message")]
    TruncatedHeader { offset: usize },

    /// A record's declared length runs past the end of the input.
    #[error(
        "position {offset}: attempted to read tag+length+value past end of message \
         (tag {tag} declares {declared} bytes, {available} available)"
    )]
    TruncatedValue {
        offset: usize,
        tag: u16,
        declared: usize,
        available: usize,
    },
}

/// Errors from the `Read`/`Write` helpers.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// An I/O error occurred while reading or writing the message.
    #[error("message I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The pairs could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The bytes read could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The input exceeds the configured maximum message size.
    #[error("message too large (more than {max} bytes)")]
    MessageTooLarge { max: usize },
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
pub type StreamResult<T> = std::result::Result<T, StreamError>;
