//! JTLVI message format: Just TLV It!
//!
//! A compact, self-delimiting binary format: tag/length/value records behind
//! a magic number and a 16-bit checksum, with an optional end-of-message
//! trailer and padding.
//!
//! # Crate Structure
//!
//! - [`codec`] — Checksum, encoder, decoder and stream helpers
//! - JSON conversion of pair lists (behind the `json` feature), re-exported
//!   through [`codec`]
//!
//! ```
//! use jtlvi::codec::{decode, encode, EncodeOptions, Pair};
//!
//! let msg = encode(vec![Pair::new(1, &b"foo"[..])], &EncodeOptions::default()).unwrap();
//! assert_eq!(decode(&msg).unwrap(), vec![Pair::new(1, &b"foo"[..])]);
//! ```

/// Re-export codec types.
pub mod codec {
    pub use jtlvi_codec::*;
}

pub use jtlvi_codec::{decode, encode, EncodeOptions, Pair, PairSource};
