//! Target expansion and datagram delivery
//!
//! - [`expand`] resolves a target specification (single address, CIDR
//!   block, or per-octet dashed ranges) into concrete addresses
//! - [`sender`] delivers a payload to every resolved address, either
//!   through a plain UDP socket or a raw socket with a forged source

pub mod expand;
pub mod sender;

pub use expand::{expand, MAX_EXPANSION, MIN_MASK};
pub use sender::{send, SendConfig};
