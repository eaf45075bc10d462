//! Internet checksum (RFC 1071)
//!
//! One implementation shared by the IPv4 header and the UDP pseudo-header
//! checksum. The data is treated as a sequence of big-endian 16-bit words;
//! an odd trailing byte is padded with zero on the right. The 32-bit sum is
//! folded with end-around carry and the one's complement of the final 16-bit
//! value is returned.

use bytes::{BufMut, BytesMut};

/// Calculate the Internet checksum over `data`.
pub fn internet_checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = data.chunks(2).fold(0, |acc, word| {
        let value = if word.len() == 2 {
            u16::from_be_bytes([word[0], word[1]])
        } else {
            (word[0] as u16) << 8
        };
        acc + value as u32
    });

    // End-around carry folding
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    !(sum as u16)
}

/// Calculate the UDP checksum for `segment` (header plus payload) including
/// the pseudo-header {source, destination, zero, protocol, UDP length}.
pub fn pseudo_header_checksum(
    source: &[u8; 4],
    destination: &[u8; 4],
    protocol: u8,
    segment: &[u8],
) -> u16 {
    let mut data = BytesMut::with_capacity(12 + segment.len());
    data.put_slice(source);
    data.put_slice(destination);
    data.put_u8(0);
    data.put_u8(protocol);
    data.put_u16(segment.len() as u16);
    data.put_slice(segment);

    internet_checksum(&data)
}

/// Verify a block whose checksum field is already folded in.
///
/// Recomputing the checksum over data that contains a correct checksum yields
/// zero (or 0xFFFF, its one's-complement equivalent).
pub fn verify_checksum(data: &[u8]) -> bool {
    let result = internet_checksum(data);
    result == 0 || result == 0xFFFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_empty() {
        assert_eq!(internet_checksum(&[]), 0xFFFF);
    }

    #[test]
    fn test_checksum_known_words() {
        // 0x0001 + 0x0002 = 0x0003, complement 0xFFFC
        let data = [0x00, 0x01, 0x00, 0x02];
        assert_eq!(internet_checksum(&data), 0xFFFC);
    }

    #[test]
    fn test_checksum_odd_length_pads_right() {
        // Trailing 0x02 counts as the word 0x0200
        let data = [0x00, 0x01, 0x02];
        assert_eq!(internet_checksum(&data), !0x0201u16);
    }

    #[test]
    fn test_checksum_carry_folding() {
        let data = [0xFF, 0xFF, 0x00, 0x02];
        // 0xFFFF + 0x0002 = 0x10001 -> folds to 0x0002
        assert_eq!(internet_checksum(&data), !0x0002u16);
    }

    #[test]
    fn test_self_verification_identity() {
        let data = [0x45, 0x00, 0x00, 0x3C, 0x1A, 0x2B];
        let checksum = internet_checksum(&data);

        let mut with_checksum = data.to_vec();
        with_checksum.extend_from_slice(&checksum.to_be_bytes());
        assert!(verify_checksum(&with_checksum));
    }

    #[test]
    fn test_pseudo_header_checksum_nonzero() {
        let src = [10, 0, 0, 1];
        let dst = [10, 0, 0, 2];
        let segment = [0x12, 0x67, 0x12, 0x61, 0x00, 0x0A, 0x00, 0x00, 0xAB, 0xCD];
        assert_ne!(pseudo_header_checksum(&src, &dst, 17, &segment), 0);
    }
}
