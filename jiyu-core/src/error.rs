//! Error types shared across the Jiyu-RS crates

use thiserror::Error;

/// Result type alias for Jiyu-RS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Jiyu-RS
#[derive(Error, Debug)]
pub enum Error {
    /// Network I/O error
    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed target address specification
    #[error("Invalid address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },

    /// Subnet mask outside the accepted 16-32 window
    #[error("Subnet mask out of range: {0} (expected 16-32)")]
    InvalidMask(u32),

    /// Address expansion would produce too many destinations
    #[error("Address range too large: {0} addresses (limit 65536)")]
    RangeTooLarge(usize),

    /// Encoded text exceeds a fixed field width
    #[error("Text exceeds field width: {len} > {max} bytes")]
    TooLong { len: usize, max: usize },

    /// Template expression could not be resolved
    #[error("Invalid template expression '{expr}': {reason}")]
    InvalidTemplate { expr: String, reason: String },

    /// Invalid parameter error
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Unknown window or execution mode
    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    /// Transmission failure, naming the destination that failed
    #[error("Transport error sending to {dest}: {reason}")]
    Transport { dest: String, reason: String },

    /// Insufficient privileges
    #[error("Insufficient privileges: {0}")]
    InsufficientPrivileges(String),
}

impl Error {
    /// Create an invalid address error
    pub fn invalid_address<A: Into<String>, B: Into<String>>(addr: A, reason: B) -> Self {
        Error::InvalidAddress {
            addr: addr.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid template error
    pub fn invalid_template<A: Into<String>, B: Into<String>>(expr: A, reason: B) -> Self {
        Error::InvalidTemplate {
            expr: expr.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<A: Into<String>, B: Into<String>>(name: A, reason: B) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a transport error
    pub fn transport<A: Into<String>, B: Into<String>>(dest: A, reason: B) -> Self {
        Error::Transport {
            dest: dest.into(),
            reason: reason.into(),
        }
    }
}
