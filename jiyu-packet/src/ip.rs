//! IPv4 header construction for the spoofed raw sender
//!
//! Only the fixed 20-byte header is supported: version 4, IHL 5, no options.
//! The total-length field covers the header plus the UDP segment that follows
//! it, and the header checksum is computed with the checksum field zeroed.

use crate::checksum::internet_checksum;
use bytes::{BufMut, BytesMut};
use std::net::Ipv4Addr;

/// IPv4 header size in bytes (no options)
pub const IPV4_HEADER_LEN: usize = 20;

/// IP protocol number for UDP
pub const IPPROTO_UDP: u8 = 17;

/// Default time-to-live
pub const DEFAULT_TTL: u8 = 64;

/// A minimal IPv4 header with a caller-controlled source address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header {
    /// Identification field
    pub identification: u16,
    /// Time to live
    pub ttl: u8,
    /// Embedded protocol number
    pub protocol: u8,
    /// Source address (spoofed, not the host's own)
    pub source: Ipv4Addr,
    /// Destination address
    pub destination: Ipv4Addr,
}

impl Ipv4Header {
    /// Create a header carrying UDP with the default TTL
    pub fn new(source: Ipv4Addr, destination: Ipv4Addr) -> Self {
        Self {
            identification: 0,
            ttl: DEFAULT_TTL,
            protocol: IPPROTO_UDP,
            source,
            destination,
        }
    }

    /// Set the identification field
    pub fn with_identification(mut self, identification: u16) -> Self {
        self.identification = identification;
        self
    }

    /// Set the time-to-live
    pub fn with_ttl(mut self, ttl: u8) -> Self {
        self.ttl = ttl;
        self
    }

    /// Serialize the header for a payload of `payload_len` bytes, with the
    /// checksum field filled in.
    pub fn to_bytes(&self, payload_len: usize) -> Vec<u8> {
        let total_length = (IPV4_HEADER_LEN + payload_len) as u16;

        let mut buf = BytesMut::with_capacity(IPV4_HEADER_LEN);
        buf.put_u8(0x45); // version 4, IHL 5
        buf.put_u8(0); // DSCP / ECN
        buf.put_u16(total_length);
        buf.put_u16(self.identification);
        buf.put_u16(0); // flags and fragment offset
        buf.put_u8(self.ttl);
        buf.put_u8(self.protocol);
        buf.put_u16(0); // checksum, zeroed during computation
        buf.put_slice(&self.source.octets());
        buf.put_slice(&self.destination.octets());

        let mut header = buf.to_vec();
        let checksum = internet_checksum(&header);
        header[10..12].copy_from_slice(&checksum.to_be_bytes());
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::verify_checksum;

    fn sample_header() -> Ipv4Header {
        Ipv4Header::new(
            Ipv4Addr::new(192, 168, 1, 1),
            Ipv4Addr::new(192, 168, 1, 100),
        )
    }

    #[test]
    fn test_header_layout() {
        let bytes = sample_header().with_identification(0xABCD).to_bytes(12);

        assert_eq!(bytes.len(), IPV4_HEADER_LEN);
        assert_eq!(bytes[0], 0x45);
        assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), 32); // 20 + 12
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 0xABCD);
        assert_eq!(bytes[8], DEFAULT_TTL);
        assert_eq!(bytes[9], IPPROTO_UDP);
        assert_eq!(&bytes[12..16], &[192, 168, 1, 1]);
        assert_eq!(&bytes[16..20], &[192, 168, 1, 100]);
    }

    #[test]
    fn test_header_checksum_verifies() {
        let bytes = sample_header().to_bytes(954);
        assert!(verify_checksum(&bytes));
    }

    #[test]
    fn test_header_ttl_override() {
        let bytes = sample_header().with_ttl(128).to_bytes(0);
        assert_eq!(bytes[8], 128);
    }
}
