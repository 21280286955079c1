//! Conversion between untyped JSON documents and pair collections.
//!
//! Accepted shapes:
//! - an array of `[tag, value]` pairs, encoded in array order;
//! - an object mapping decimal tag strings to values, encoded in ascending
//!   tag order.
//!
//! A value is an array of integers in `0..=255`. Strings are text, not
//! bytes, and are rejected.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde_json::Value;

use crate::error::{EncodeError, EncodeResult};
use crate::pair::{tag_from_int, Pair, PairSource};

/// Build a [`PairSource`] from a JSON document.
pub fn pairs_from_json(doc: &Value) -> EncodeResult<PairSource> {
    match doc {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| pair_from_json(index, item))
            .collect::<EncodeResult<Vec<Pair>>>()
            .map(PairSource::Sequence),
        Value::Object(map) => {
            let mut out = BTreeMap::new();
            for (key, value) in map {
                let raw = key
                    .trim()
                    .parse::<i128>()
                    .map_err(|_| EncodeError::NonIntegerTag { tag: key.clone() })?;
                let tag = tag_from_int(raw)?;
                out.insert(tag, value_from_json(tag, value)?);
            }
            Ok(PairSource::Mapping(out))
        }
        other => Err(EncodeError::InvalidContainer {
            observed: type_name(other),
        }),
    }
}

/// Render pairs as a JSON array of `[tag, [bytes...]]`, the same shape
/// [`pairs_from_json`] accepts.
pub fn pairs_to_json(pairs: &[Pair]) -> Value {
    Value::Array(
        pairs
            .iter()
            .map(|pair| {
                Value::Array(vec![
                    Value::from(pair.tag),
                    Value::Array(pair.value.iter().map(|&b| Value::from(b)).collect()),
                ])
            })
            .collect(),
    )
}

fn pair_from_json(index: usize, item: &Value) -> EncodeResult<Pair> {
    let (tag, value) = match item.as_array().map(Vec::as_slice) {
        Some([tag, value]) => (tag, value),
        _ => {
            return Err(EncodeError::InvalidPair {
                index,
                observed: type_name(item),
            })
        }
    };
    let tag = tag_from_json(tag)?;
    Ok(Pair {
        tag,
        value: value_from_json(tag, value)?,
    })
}

fn tag_from_json(tag: &Value) -> EncodeResult<u16> {
    let raw = tag
        .as_i64()
        .map(i128::from)
        .or_else(|| tag.as_u64().map(i128::from))
        .ok_or_else(|| EncodeError::NonIntegerTag {
            tag: tag.to_string(),
        })?;
    tag_from_int(raw)
}

fn value_from_json(tag: u16, value: &Value) -> EncodeResult<Bytes> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(EncodeError::ValueNotBytes {
                tag,
                observed: type_name(other),
            })
        }
    };
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|b| u8::try_from(b).ok())
                .ok_or(EncodeError::ValueNotBytes {
                    tag,
                    observed: "array with non-byte elements",
                })
        })
        .collect::<EncodeResult<Vec<u8>>>()
        .map(Bytes::from)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
