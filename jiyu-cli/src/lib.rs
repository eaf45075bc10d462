//! Command-line interface for the Jiyu frame toolkit
//!
//! Argument parsing lives in [`args`]; the binary entry point wires the
//! parsed action into frame encoding and delivery.

pub mod args;

pub use args::{Cli, SettingArgs};
