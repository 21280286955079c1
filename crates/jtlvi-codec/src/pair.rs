use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;

use crate::error::{EncodeError, EncodeResult};
use crate::layout::{MAX_TAG, TRAILER_TAG};

/// One tag/value entry of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair {
    /// Record tag. `0..=65534`; 65535 is the trailer.
    pub tag: u16,
    /// Opaque record value.
    pub value: Bytes,
}

impl Pair {
    /// Create a new pair.
    pub fn new(tag: u16, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// The encoded size of this record (tag + length + value).
    pub fn wire_size(&self) -> usize {
        crate::layout::RECORD_HEADER_SIZE + self.value.len()
    }
}

impl<B: Into<Bytes>> From<(u16, B)> for Pair {
    fn from((tag, value): (u16, B)) -> Self {
        Self::new(tag, value)
    }
}

/// Validate an integer tag coming from an untyped source.
///
/// Distinguishes values that cannot fit the tag field from the one value
/// that fits but is reserved for the trailer.
pub fn tag_from_int(raw: i128) -> EncodeResult<u16> {
    if raw == i128::from(TRAILER_TAG) {
        return Err(EncodeError::ReservedTag { tag: TRAILER_TAG });
    }
    if !(0..=i128::from(MAX_TAG)).contains(&raw) {
        return Err(EncodeError::TagOutOfRange { tag: raw });
    }
    Ok(raw as u16)
}

/// The collection handed to the encoder.
///
/// A sequence is encoded in the given order (before optional sorting); a
/// mapping yields its entries in ascending key order. Both are normalized to
/// a plain pair list by [`PairSource::into_pairs`] before any encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairSource {
    /// Ordered pairs. Duplicate tags allowed.
    Sequence(Vec<Pair>),
    /// Key-unique mapping.
    Mapping(BTreeMap<u16, Bytes>),
}

impl PairSource {
    /// Normalize into an ordered pair list.
    pub fn into_pairs(self) -> Vec<Pair> {
        match self {
            PairSource::Sequence(pairs) => pairs,
            PairSource::Mapping(map) => map
                .into_iter()
                .map(|(tag, value)| Pair { tag, value })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PairSource::Sequence(pairs) => pairs.len(),
            PairSource::Mapping(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PairSource {
    fn default() -> Self {
        PairSource::Sequence(Vec::new())
    }
}

impl From<Vec<Pair>> for PairSource {
    fn from(pairs: Vec<Pair>) -> Self {
        PairSource::Sequence(pairs)
    }
}

impl From<&[Pair]> for PairSource {
    fn from(pairs: &[Pair]) -> Self {
        PairSource::Sequence(pairs.to_vec())
    }
}

impl<B: Into<Bytes>> From<Vec<(u16, B)>> for PairSource {
    fn from(pairs: Vec<(u16, B)>) -> Self {
        PairSource::Sequence(pairs.into_iter().map(Pair::from).collect())
    }
}

impl<B: Into<Bytes>> From<BTreeMap<u16, B>> for PairSource {
    fn from(map: BTreeMap<u16, B>) -> Self {
        PairSource::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<B: Into<Bytes>, S> From<HashMap<u16, B, S>> for PairSource {
    fn from(map: HashMap<u16, B, S>) -> Self {
        PairSource::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl FromIterator<Pair> for PairSource {
    fn from_iter<I: IntoIterator<Item = Pair>>(iter: I) -> Self {
        PairSource::Sequence(iter.into_iter().collect())
    }
}
