//! The closed set of commands the encoder understands

use crate::encode::Overflow;
use crate::{frames, template};
use jiyu_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Window state for a remotely launched program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    #[default]
    Normal,
    Minimize,
    Maximize,
}

impl WindowMode {
    /// The 14-byte mode block embedded in an execute frame
    pub fn block(self) -> [u8; 14] {
        let selector = match self {
            WindowMode::Normal => 0x00,
            WindowMode::Minimize => 0x01,
            WindowMode::Maximize => 0x02,
        };
        [selector, 0, 0, 0, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    }
}

impl FromStr for WindowMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(WindowMode::Normal),
            "minimize" => Ok(WindowMode::Minimize),
            "maximize" => Ok(WindowMode::Maximize),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowMode::Normal => "normal",
            WindowMode::Minimize => "minimize",
            WindowMode::Maximize => "maximize",
        };
        write!(f, "{name}")
    }
}

/// Transmission reliability level in a settings frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Reliability {
    Low = 0,
    #[default]
    Medium = 1,
    High = 2,
}

impl FromStr for Reliability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Reliability::Low),
            "medium" => Ok(Reliability::Medium),
            "high" => Ok(Reliability::High),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

/// Tri-state option in a settings frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum TriState {
    Disable = 0,
    Enable = 1,
    #[default]
    Auto = 2,
}

impl FromStr for TriState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "disable" => Ok(TriState::Disable),
            "enable" => Ok(TriState::Enable),
            "auto" => Ok(TriState::Auto),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

/// Client configuration carried by an apply-settings frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub network: bool,
    pub transmission_reliability: Reliability,
    /// Offline lag detection threshold, in seconds
    pub offline_lag_time_detection: u32,
    pub audio: bool,
    pub playback_mute: bool,
    pub recording_mute: bool,
    /// Recording volume, 0-100
    pub recording_volume: u32,
    /// Playback volume, 0-100
    pub playback_volume: u32,
    pub password: bool,
    pub password_value: String,
    pub preventing_process_termination: TriState,
    pub lock_screen_when_maliciously_offline: TriState,
    pub hide_the_setup_name_button: TriState,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: false,
            transmission_reliability: Reliability::Medium,
            offline_lag_time_detection: 10,
            audio: false,
            playback_mute: false,
            recording_mute: false,
            recording_volume: 80,
            playback_volume: 80,
            password: false,
            password_value: String::new(),
            preventing_process_termination: TriState::Auto,
            lock_screen_when_maliciously_offline: TriState::Auto,
            hide_the_setup_name_button: TriState::Auto,
        }
    }
}

/// One protocol action, consumed once by [`Command::encode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Display a message dialog
    Message(String),
    /// Launch a program
    Execute {
        program: String,
        arguments: String,
        mode: WindowMode,
    },
    /// Open a URL in the default browser
    OpenWebsite(String),
    /// Shut down or reboot the machine
    Shutdown {
        timeout: Option<u32>,
        message: String,
        reboot: bool,
    },
    /// Close every open window
    CloseWindows {
        timeout: Option<u32>,
        message: String,
    },
    /// Close only the foreground window
    CloseTopWindow,
    /// Rename the client
    Rename { name: String, name_id: u32 },
    /// Push a configuration block
    ApplySettings(Settings),
    /// Ad-hoc frame from a hex template and positional arguments
    Custom { template: String, args: Vec<String> },
}

impl Command {
    /// Build the wire-ready frame for this command.
    pub fn encode(&self, policy: Overflow) -> Result<Vec<u8>> {
        match self {
            Command::Message(text) => frames::message(text, policy),
            Command::Execute {
                program,
                arguments,
                mode,
            } => frames::execute(program, arguments, *mode, policy),
            Command::OpenWebsite(url) => frames::website(url),
            Command::Shutdown {
                timeout,
                message,
                reboot,
            } => frames::shutdown(*timeout, message, *reboot, policy),
            Command::CloseWindows { timeout, message } => {
                frames::close_windows(*timeout, message, policy)
            }
            Command::CloseTopWindow => Ok(frames::close_top_window()),
            Command::Rename { name, name_id } => frames::rename(name, *name_id, policy),
            Command::ApplySettings(settings) => frames::apply_settings(settings, policy),
            Command::Custom { template, args } => template::expand(template, args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_mode_blocks() {
        assert_eq!(WindowMode::Normal.block()[0], 0x00);
        assert_eq!(WindowMode::Minimize.block()[0], 0x01);
        assert_eq!(WindowMode::Maximize.block()[0], 0x02);
        for mode in [WindowMode::Normal, WindowMode::Minimize, WindowMode::Maximize] {
            assert_eq!(&mode.block()[1..], &[0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        }
    }

    #[test]
    fn test_window_mode_from_str() {
        assert_eq!(WindowMode::from_str("minimize").unwrap(), WindowMode::Minimize);
        assert!(matches!(
            WindowMode::from_str("hidden"),
            Err(Error::InvalidMode(_))
        ));
    }

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(Reliability::Low as u32, 0);
        assert_eq!(Reliability::Medium as u32, 1);
        assert_eq!(Reliability::High as u32, 2);
        assert_eq!(TriState::Disable as u32, 0);
        assert_eq!(TriState::Enable as u32, 1);
        assert_eq!(TriState::Auto as u32, 2);
    }

    #[test]
    fn test_command_dispatch() {
        let frame = Command::Message("Hi".into())
            .encode(Overflow::Strict)
            .unwrap();
        assert_eq!(&frame[0..4], b"DMOC");

        let frame = Command::CloseTopWindow.encode(Overflow::Strict).unwrap();
        assert_eq!(&frame[0..4], b"DMOC");
    }
}
