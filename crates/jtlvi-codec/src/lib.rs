//! Checksummed Tag-Length-Value message encoding and decoding.
//!
//! Every message is laid out as:
//! - A 2-byte magic number (`0xD40E`)
//! - A 2-byte big-endian BSD checksum over the whole message, computed with
//!   this field zeroed
//! - Zero or more records: 2-byte tag, 2-byte length, value
//! - An optional trailer record (tag `0xFFFF`, length 0)
//! - Optional padding after the trailer
//!
//! Encoding and decoding are pure functions over in-memory buffers.

pub mod checksum;
pub mod decoder;
pub mod encoder;
pub mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod layout;
pub mod pair;
pub mod stream;

pub use checksum::bsd_checksum;
pub use decoder::{decode, decode_bytes};
pub use encoder::{encode, EncodeOptions};
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult, StreamError, StreamResult};
#[cfg(feature = "json")]
pub use json::{pairs_from_json, pairs_to_json};
pub use layout::{
    inspect, MessageLayout, RecordInfo, HEADER_SIZE, MAGIC, MAX_PADDED_LENGTH, MAX_TAG, MAX_VALUE_LEN,
    RECORD_HEADER_SIZE, TRAILER_TAG,
};
pub use pair::{tag_from_int, Pair, PairSource};
pub use stream::{read_message, write_message, ReadConfig, DEFAULT_MAX_MESSAGE};
