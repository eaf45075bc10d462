//! Frame construction for the classroom-management control protocol
//!
//! This crate reproduces the target protocol's wire format byte for byte:
//!
//! - [`command`] - the closed [`Command`] set and its settings/mode types
//! - [`encode`] - wide-character text encoding with an overflow policy
//! - [`frames`] - one byte-exact builder per command (`DMOC`/`GCMN` families)
//! - [`template`] - the hex-template micro-interpreter for ad-hoc frames
//!
//! # Example
//!
//! ```rust
//! use jiyu_protocol::{Command, Overflow};
//!
//! let frame = Command::Message("Hello".into())
//!     .encode(Overflow::Strict)
//!     .unwrap();
//! assert_eq!(frame.len(), 954);
//! assert_eq!(&frame[0..4], b"DMOC");
//! ```

pub mod command;
pub mod encode;
pub mod frames;
pub mod template;

// Re-export commonly used types
pub use command::{Command, Reliability, Settings, TriState, WindowMode};
pub use encode::{encode_text, Overflow};
