//! Fluent builder assembling a complete spoofed IP/UDP datagram
//!
//! Produces the exact byte sequence handed to a raw socket with header
//! inclusion enabled: IPv4 header, UDP header, payload.

use crate::ip::Ipv4Header;
use crate::udp::UdpHeader;
use std::net::Ipv4Addr;

/// Builder for a raw UDP datagram with a caller-chosen source address
#[derive(Debug, Clone)]
pub struct SpoofedUdp {
    source: Ipv4Addr,
    destination: Ipv4Addr,
    source_port: u16,
    destination_port: u16,
    identification: u16,
    payload: Vec<u8>,
}

impl SpoofedUdp {
    /// Start a datagram from `source` (spoofed) to `destination`
    pub fn new(source: Ipv4Addr, destination: Ipv4Addr) -> Self {
        Self {
            source,
            destination,
            source_port: 0,
            destination_port: 0,
            identification: 0,
            payload: Vec::new(),
        }
    }

    /// Set source and destination ports
    pub fn ports(mut self, source_port: u16, destination_port: u16) -> Self {
        self.source_port = source_port;
        self.destination_port = destination_port;
        self
    }

    /// Set the IP identification field
    pub fn identification(mut self, identification: u16) -> Self {
        self.identification = identification;
        self
    }

    /// Set the UDP payload
    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// Assemble the wire-ready packet: IP header + UDP header + payload
    pub fn build(self) -> Vec<u8> {
        let segment = UdpHeader::new(self.source_port, self.destination_port).to_bytes(
            self.source,
            self.destination,
            &self.payload,
        );

        let mut packet = Ipv4Header::new(self.source, self.destination)
            .with_identification(self.identification)
            .to_bytes(segment.len());
        packet.extend_from_slice(&segment);
        packet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::verify_checksum;
    use crate::ip::{IPPROTO_UDP, IPV4_HEADER_LEN};
    use crate::udp::UDP_HEADER_LEN;

    #[test]
    fn test_build_spoofed_datagram() {
        let payload = vec![0x44, 0x4D, 0x4F, 0x43, 0x00, 0x00];
        let packet = SpoofedUdp::new(
            Ipv4Addr::new(192, 168, 233, 2),
            Ipv4Addr::new(192, 168, 233, 50),
        )
        .ports(31337, 4705)
        .identification(1000)
        .payload(payload.clone())
        .build();

        assert_eq!(packet.len(), IPV4_HEADER_LEN + UDP_HEADER_LEN + payload.len());

        // IP header fields
        assert_eq!(packet[0], 0x45);
        assert_eq!(
            u16::from_be_bytes([packet[2], packet[3]]),
            packet.len() as u16
        );
        assert_eq!(u16::from_be_bytes([packet[4], packet[5]]), 1000);
        assert_eq!(packet[9], IPPROTO_UDP);
        assert_eq!(&packet[12..16], &[192, 168, 233, 2]);
        assert_eq!(&packet[16..20], &[192, 168, 233, 50]);
        assert!(verify_checksum(&packet[..IPV4_HEADER_LEN]));

        // UDP header fields
        assert_eq!(u16::from_be_bytes([packet[20], packet[21]]), 31337);
        assert_eq!(u16::from_be_bytes([packet[22], packet[23]]), 4705);
        assert_eq!(
            u16::from_be_bytes([packet[24], packet[25]]),
            (UDP_HEADER_LEN + payload.len()) as u16
        );

        // Payload
        assert_eq!(&packet[28..], &payload[..]);
    }
}
