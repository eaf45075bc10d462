//! UDP header construction with pseudo-header checksum
//!
//! Builds the 8-byte UDP header for the spoofed raw sender. The checksum
//! covers a pseudo-header {source, destination, zero, protocol, length}
//! concatenated with the header and payload, with the checksum field zeroed
//! during its own computation.

use crate::checksum::pseudo_header_checksum;
use crate::ip::IPPROTO_UDP;
use bytes::{BufMut, BytesMut};
use std::net::Ipv4Addr;

/// UDP header size in bytes
pub const UDP_HEADER_LEN: usize = 8;

/// A UDP header for a single datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHeader {
    /// Source port
    pub source_port: u16,
    /// Destination port
    pub destination_port: u16,
}

impl UdpHeader {
    /// Create a new UDP header
    pub fn new(source_port: u16, destination_port: u16) -> Self {
        Self {
            source_port,
            destination_port,
        }
    }

    /// Serialize header plus payload into a complete UDP segment.
    ///
    /// The addresses are needed for the pseudo-header checksum. A computed
    /// checksum of zero is transmitted as 0xFFFF, since zero on the wire
    /// means "no checksum".
    pub fn to_bytes(&self, source: Ipv4Addr, destination: Ipv4Addr, payload: &[u8]) -> Vec<u8> {
        let length = (UDP_HEADER_LEN + payload.len()) as u16;

        let mut buf = BytesMut::with_capacity(UDP_HEADER_LEN + payload.len());
        buf.put_u16(self.source_port);
        buf.put_u16(self.destination_port);
        buf.put_u16(length);
        buf.put_u16(0); // checksum, zeroed during computation
        buf.put_slice(payload);

        let checksum = pseudo_header_checksum(
            &source.octets(),
            &destination.octets(),
            IPPROTO_UDP,
            &buf,
        );
        let checksum = if checksum == 0 { 0xFFFF } else { checksum };

        let mut segment = buf.to_vec();
        segment[6..8].copy_from_slice(&checksum.to_be_bytes());
        segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::internet_checksum;
    use bytes::BufMut;

    #[test]
    fn test_segment_layout() {
        let src = Ipv4Addr::new(10, 1, 2, 3);
        let dst = Ipv4Addr::new(10, 1, 2, 4);
        let payload = [0xDE, 0xAD, 0xBE, 0xEF];

        let segment = UdpHeader::new(4711, 4705).to_bytes(src, dst, &payload);

        assert_eq!(segment.len(), UDP_HEADER_LEN + payload.len());
        assert_eq!(u16::from_be_bytes([segment[0], segment[1]]), 4711);
        assert_eq!(u16::from_be_bytes([segment[2], segment[3]]), 4705);
        assert_eq!(u16::from_be_bytes([segment[4], segment[5]]), 12);
        assert_eq!(&segment[8..], &payload);
    }

    #[test]
    fn test_segment_checksum_verifies() {
        let src = Ipv4Addr::new(192, 168, 233, 2);
        let dst = Ipv4Addr::new(192, 168, 233, 100);
        let payload = b"DMOC test payload";

        let segment = UdpHeader::new(20000, 4705).to_bytes(src, dst, payload);

        // Recompute over pseudo-header + segment with the checksum folded in
        let mut data = BytesMut::new();
        data.put_slice(&src.octets());
        data.put_slice(&dst.octets());
        data.put_u8(0);
        data.put_u8(IPPROTO_UDP);
        data.put_u16(segment.len() as u16);
        data.put_slice(&segment);

        let result = internet_checksum(&data);
        assert!(result == 0 || result == 0xFFFF);
    }
}
