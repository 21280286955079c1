//! BSD-style 16-bit rotate-and-add checksum.
//!
//! Detects accidental corruption only; it is not a MAC.

use crate::layout::{CHECKSUM_RANGE, HEADER_SIZE};

/// Fold one byte into the running checksum.
#[inline]
fn step(acc: u16, byte: u8) -> u16 {
    acc.rotate_right(1).wrapping_add(u16::from(byte))
}

/// Compute the BSD checksum of `input`.
///
/// ```
/// use jtlvi_codec::bsd_checksum;
///
/// assert_eq!(bsd_checksum(b""), 0);
/// assert_eq!(bsd_checksum(b"foo"), 192);
/// ```
pub fn bsd_checksum(input: &[u8]) -> u16 {
    input.iter().fold(0u16, |acc, &byte| step(acc, byte))
}

/// Compute the checksum of a message as if its checksum field were zero.
///
/// `message` must be at least [`HEADER_SIZE`] bytes long.
pub(crate) fn checksum_with_zeroed_field(message: &[u8]) -> u16 {
    debug_assert!(message.len() >= HEADER_SIZE);
    let acc = message[..CHECKSUM_RANGE.start]
        .iter()
        .fold(0u16, |acc, &byte| step(acc, byte));
    let acc = CHECKSUM_RANGE.fold(acc, |acc, _| step(acc, 0));
    message[CHECKSUM_RANGE.end..]
        .iter()
        .fold(acc, |acc, &byte| step(acc, byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(bsd_checksum(b""), 0);
    }

    #[test]
    fn single_zero_byte_is_zero() {
        assert_eq!(bsd_checksum(b"\x00"), 0);
    }

    #[test]
    fn known_vectors() {
        assert_eq!(bsd_checksum(b"foo"), 192);
        assert_eq!(bsd_checksum(&[0xFF; 128]), 62459);
    }

    #[test]
    fn order_sensitive() {
        assert_ne!(bsd_checksum(b"ab"), bsd_checksum(b"ba"));
    }

    #[test]
    fn rotation_matches_manual_formula() {
        let input = [0x01, 0x80, 0xFE, 0x7F, 0x00, 0x33];
        let mut acc: u32 = 0;
        for byte in input {
            acc = (acc >> 1) | ((acc & 1) << 15);
            acc += u32::from(byte);
            acc &= 0xFFFF;
        }
        assert_eq!(u32::from(bsd_checksum(&input)), acc);
    }

    #[test]
    fn zeroed_field_ignores_stored_checksum() {
        let stored = [0xD4, 0x0E, 0xAB, 0xCD, 0xFF, 0xFF, 0x00, 0x00];
        let zeroed = [0xD4, 0x0E, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00];
        assert_eq!(checksum_with_zeroed_field(&stored), bsd_checksum(&zeroed));
        assert_eq!(checksum_with_zeroed_field(&stored), 0x8061);
    }
}
