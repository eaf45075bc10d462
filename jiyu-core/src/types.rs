//! Common types used throughout Jiyu-RS

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

/// Default UDP port the target client listens on
pub const DEFAULT_TARGET_PORT: u16 = 4705;

/// A resolved destination: one concrete address and port pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub addr: Ipv4Addr,
    pub port: u16,
}

impl Endpoint {
    /// Create a new endpoint
    pub const fn new(addr: Ipv4Addr, port: u16) -> Self {
        Self { addr, port }
    }

    /// Convert to a socket address
    pub fn to_socket_addr(self) -> SocketAddrV4 {
        SocketAddrV4::new(self.addr, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

impl From<Endpoint> for SocketAddrV4 {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.to_socket_addr()
    }
}
