//! Raw packet construction for Jiyu-RS
//!
//! This crate builds the IP and UDP headers used by the spoofed-transport
//! path, with one shared Internet checksum implementation (RFC 1071):
//!
//! - [`checksum`] - Internet checksum and pseudo-header checksum
//! - [`ip`] - minimal 20-byte IPv4 header with a spoofable source
//! - [`udp`] - UDP header with pseudo-header checksum
//! - [`builder`] - fluent assembly of a complete raw datagram
//!
//! # Example
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use jiyu_packet::SpoofedUdp;
//!
//! let packet = SpoofedUdp::new(
//!     Ipv4Addr::new(192, 168, 1, 1),
//!     Ipv4Addr::new(192, 168, 1, 100),
//! )
//! .ports(31337, 4705)
//! .identification(0x1234)
//! .payload(vec![0x01, 0x02])
//! .build();
//!
//! assert_eq!(packet.len(), 20 + 8 + 2);
//! ```

pub mod builder;
pub mod checksum;
pub mod ip;
pub mod udp;

// Re-export commonly used types
pub use builder::SpoofedUdp;
pub use checksum::{internet_checksum, pseudo_header_checksum, verify_checksum};
pub use ip::{Ipv4Header, IPPROTO_UDP, IPV4_HEADER_LEN};
pub use udp::{UdpHeader, UDP_HEADER_LEN};
