//! Jiyu-RS Core Library
//!
//! This crate provides the error taxonomy and shared types for the Jiyu-RS
//! classroom-protocol datagram toolkit.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::{Endpoint, DEFAULT_TARGET_PORT};
