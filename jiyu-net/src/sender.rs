//! Datagram transmission
//!
//! Two delivery paths share one entry point:
//!
//! - plain: an ordinary UDP socket bound to an ephemeral port, used when
//!   no source address is given
//! - spoofed: a raw IPv4 socket with header inclusion, carrying a
//!   hand-built IP/UDP header pair so the frame appears to come from the
//!   configured source address (usually the teacher machine)
//!
//! The target specification is expanded first and the payload is sent to
//! every resolved address sequentially. The first failure aborts the run
//! so a misconfigured interface does not silently drop half a sweep.

use crate::expand::expand;
use jiyu_core::{Endpoint, Error, Result, DEFAULT_TARGET_PORT};
use jiyu_packet::SpoofedUdp;
use rand::Rng;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};
use tracing::debug;

/// How a payload should leave the machine
#[derive(Debug, Clone, Copy, Default)]
pub struct SendConfig {
    /// Source address to forge. `None` selects the plain socket path.
    pub source: Option<Ipv4Addr>,
    /// Fixed source port for spoofed frames; a fresh random port per
    /// packet when absent
    pub source_port: Option<u16>,
    /// Fixed IP identification for spoofed frames; random per packet
    /// when absent
    pub ip_id: Option<u16>,
}

impl SendConfig {
    /// Plain-socket delivery with no spoofing
    pub fn plain() -> Self {
        Self::default()
    }

    /// Spoofed delivery claiming to originate from `source`
    pub fn spoofed(source: Ipv4Addr) -> Self {
        Self {
            source: Some(source),
            source_port: None,
            ip_id: None,
        }
    }
}

/// Send `payload` to every address the target specification resolves to.
///
/// `port` 0 falls back to the protocol default (4705). Returns the
/// endpoints actually written to, in send order.
pub fn send(config: &SendConfig, target: &str, port: u16, payload: &[u8]) -> Result<Vec<Endpoint>> {
    if config.source.is_none() {
        if config.source_port.is_some() {
            return Err(Error::invalid_parameter(
                "source_port",
                "source port requires a spoofed source address",
            ));
        }
        if config.ip_id.is_some() {
            return Err(Error::invalid_parameter(
                "ip_id",
                "IP identification requires a spoofed source address",
            ));
        }
    }

    let port = if port == 0 { DEFAULT_TARGET_PORT } else { port };
    let destinations: Vec<Endpoint> = expand(target)?
        .into_iter()
        .map(|addr| Endpoint::new(addr, port))
        .collect();

    match config.source {
        None => send_plain(&destinations, payload)?,
        Some(source) => send_spoofed(config, source, &destinations, payload)?,
    }
    Ok(destinations)
}

fn send_plain(destinations: &[Endpoint], payload: &[u8]) -> Result<()> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.set_broadcast(true)?;

    for endpoint in destinations {
        socket
            .send_to(payload, endpoint.to_socket_addr())
            .map_err(|e| Error::transport(endpoint.to_string(), e.to_string()))?;
        debug!(dest = %endpoint, bytes = payload.len(), "sent datagram");
    }
    Ok(())
}

fn send_spoofed(
    config: &SendConfig,
    source: Ipv4Addr,
    destinations: &[Endpoint],
    payload: &[u8],
) -> Result<()> {
    let socket = open_raw_socket()?;
    let mut rng = rand::thread_rng();

    for endpoint in destinations {
        let source_port = config
            .source_port
            .unwrap_or_else(|| rng.gen_range(1024..=u16::MAX));
        let ip_id = config.ip_id.unwrap_or_else(|| rng.gen());

        let packet = SpoofedUdp::new(source, endpoint.addr)
            .ports(source_port, endpoint.port)
            .identification(ip_id)
            .payload(payload.to_vec())
            .build();

        // Destination port is already inside the packet; the kernel only
        // needs the address to route the frame.
        let dest = SockAddr::from(SocketAddrV4::new(endpoint.addr, endpoint.port));
        socket
            .send_to(&packet, &dest)
            .map_err(|e| Error::transport(endpoint.to_string(), e.to_string()))?;
        debug!(
            dest = %endpoint,
            spoofed_source = %source,
            source_port,
            ip_id,
            bytes = packet.len(),
            "sent spoofed datagram"
        );
    }
    Ok(())
}

/// Open a raw IPv4 socket that accepts caller-supplied headers.
fn open_raw_socket() -> Result<Socket> {
    let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::UDP)).map_err(|e| {
        if e.kind() == ErrorKind::PermissionDenied {
            Error::InsufficientPrivileges(
                "raw sockets require root or CAP_NET_RAW; omit the spoofed source to use a plain socket".into(),
            )
        } else {
            Error::Io(e)
        }
    })?;
    socket.set_header_included(true)?;
    socket.set_broadcast(true)?;
    Ok(socket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_port_without_source_rejected() {
        let config = SendConfig {
            source: None,
            source_port: Some(5000),
            ip_id: None,
        };
        let err = send(&config, "127.0.0.1", 4705, b"x").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_ip_id_without_source_rejected() {
        let config = SendConfig {
            source: None,
            source_port: None,
            ip_id: Some(7),
        };
        let err = send(&config, "127.0.0.1", 4705, b"x").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_bad_target_reported_before_any_send() {
        let err = send(&SendConfig::plain(), "300.0.0.1", 4705, b"x").unwrap_err();
        assert!(matches!(err, Error::InvalidAddress { .. }));
    }

    #[test]
    fn test_plain_send_to_loopback() {
        let receiver = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = receiver.local_addr().unwrap().port();

        let sent = send(&SendConfig::plain(), "127.0.0.1", port, b"DMOC").unwrap();
        assert_eq!(sent, vec![Endpoint::new(Ipv4Addr::LOCALHOST, port)]);

        let mut buf = [0u8; 16];
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"DMOC");
    }

    #[test]
    fn test_port_zero_defaults() {
        let sent = send(&SendConfig::plain(), "127.0.0.1", 0, b"x").unwrap();
        assert_eq!(sent[0].port, DEFAULT_TARGET_PORT);
    }
}
