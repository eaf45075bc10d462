//! CLI argument parsing
//!
//! One mutually exclusive action per invocation, plus a network block that
//! controls where and how the resulting frame is sent. The `--setting`
//! option carries its own option string, parsed by a second embedded
//! parser so the settings surface does not crowd the main help text.

use clap::{ArgGroup, Parser};
use jiyu_core::{Error, Result, DEFAULT_TARGET_PORT};
use jiyu_protocol::{Command, Overflow, Reliability, Settings, TriState, WindowMode};
use std::net::Ipv4Addr;

#[derive(Parser, Debug)]
#[command(name = "jiyu-udp")]
#[command(version, about = "Frame crafting toolkit for the Jiyu classroom protocol", long_about = None)]
#[command(group(ArgGroup::new("action").required(true).multiple(false)))]
pub struct Cli {
    /// Teacher address to forge as the frame source (requires raw sockets)
    #[arg(short = 'f', long, value_name = "ADDR")]
    pub teacher_ip: Option<Ipv4Addr>,

    /// Fixed source port for spoofed frames (random per packet by default)
    #[arg(long, requires = "teacher_ip", value_name = "PORT")]
    pub teacher_port: Option<u16>,

    /// Target specification: address, CIDR block, or per-octet ranges
    #[arg(short = 't', long = "target", required = true, num_args = 1.., value_name = "SPEC")]
    pub targets: Vec<String>,

    /// Destination UDP port
    #[arg(long, default_value_t = DEFAULT_TARGET_PORT, value_name = "PORT")]
    pub target_port: u16,

    /// Fixed IP identification for spoofed frames (random per packet by default)
    #[arg(short = 'i', long, requires = "teacher_ip", value_name = "ID")]
    pub ip_id: Option<u16>,

    /// Policy when text exceeds a fixed field: strict, warn, truncate
    #[arg(long, default_value = "strict", value_name = "POLICY")]
    pub on_overflow: Overflow,

    /// Display a message dialog on the target
    #[arg(short = 'm', long, group = "action", value_name = "TEXT")]
    pub message: Option<String>,

    /// Open a URL in the target's default browser
    #[arg(short = 'w', long, group = "action", value_name = "URL")]
    pub website: Option<String>,

    /// Run a shell command through cmd.exe, minimized
    #[arg(short = 'c', long, group = "action", value_name = "CMD")]
    pub command: Option<String>,

    /// Launch a program: PROGRAM [ARGUMENTS]
    #[arg(short = 'e', long, group = "action", num_args = 1..=2, value_name = "PROGRAM")]
    pub execute: Option<Vec<String>>,

    /// Window state for --execute: normal, minimize, maximize
    #[arg(long, default_value = "normal", requires = "execute", value_name = "MODE")]
    pub window_mode: WindowMode,

    /// Shut the target down: [TIMEOUT [MESSAGE]]
    #[arg(long, group = "action", num_args = 0..=2, value_name = "ARG")]
    pub shutdown: Option<Vec<String>>,

    /// Reboot the target: [TIMEOUT [MESSAGE]]
    #[arg(long, group = "action", num_args = 0..=2, value_name = "ARG")]
    pub reboot: Option<Vec<String>>,

    /// Close every window on the target: [TIMEOUT [MESSAGE]]
    #[arg(long, group = "action", num_args = 0..=2, value_name = "ARG")]
    pub close_windows: Option<Vec<String>>,

    /// Close only the target's foreground window
    #[arg(long, group = "action")]
    pub close_top_window: bool,

    /// Rename the client: NAME NAME_ID
    #[arg(long, group = "action", num_args = 2, value_name = "ARG")]
    pub rename: Option<Vec<String>>,

    /// Push client settings; see the embedded option string syntax
    #[arg(
        long,
        group = "action",
        num_args = 0..=1,
        default_missing_value = "",
        allow_hyphen_values = true,
        value_name = "OPTIONS"
    )]
    pub setting: Option<String>,

    /// Send raw hex bytes verbatim
    #[arg(long, group = "action", value_name = "HEX")]
    pub hex: Option<String>,

    /// Expand a hex template: ":TEMPLATE"|FILE [ARGS...]
    #[arg(long, group = "action", num_args = 1.., value_name = "ARG")]
    pub pkg: Option<Vec<String>>,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolve the selected action into a protocol command.
    pub fn action(&self) -> Result<Command> {
        if let Some(text) = &self.message {
            return Ok(Command::Message(text.clone()));
        }
        if let Some(url) = &self.website {
            return Ok(Command::OpenWebsite(url.clone()));
        }
        if let Some(cmd) = &self.command {
            // The client runs the program directly, so shell syntax only
            // works when routed through the command interpreter.
            return Ok(Command::Execute {
                program: "cmd.exe".into(),
                arguments: format!("/D /C \"{cmd}\""),
                mode: WindowMode::Minimize,
            });
        }
        if let Some(args) = &self.execute {
            return Ok(Command::Execute {
                program: args[0].clone(),
                arguments: args.get(1).cloned().unwrap_or_default(),
                mode: self.window_mode,
            });
        }
        if let Some(args) = &self.shutdown {
            let (timeout, message) = timed_args(args)?;
            return Ok(Command::Shutdown {
                timeout,
                message,
                reboot: false,
            });
        }
        if let Some(args) = &self.reboot {
            let (timeout, message) = timed_args(args)?;
            return Ok(Command::Shutdown {
                timeout,
                message,
                reboot: true,
            });
        }
        if let Some(args) = &self.close_windows {
            let (timeout, message) = timed_args(args)?;
            return Ok(Command::CloseWindows { timeout, message });
        }
        if self.close_top_window {
            return Ok(Command::CloseTopWindow);
        }
        if let Some(args) = &self.rename {
            let name_id = args[1].parse().map_err(|_| {
                Error::invalid_parameter("rename", format!("'{}' is not a numeric id", args[1]))
            })?;
            return Ok(Command::Rename {
                name: args[0].clone(),
                name_id,
            });
        }
        if let Some(opts) = &self.setting {
            let settings = SettingArgs::parse_opts(opts)?.into_settings();
            return Ok(Command::ApplySettings(settings));
        }
        if let Some(hex) = &self.hex {
            let template: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
            return Ok(Command::Custom {
                template,
                args: Vec::new(),
            });
        }
        if let Some(args) = &self.pkg {
            let template = match args[0].strip_prefix(':') {
                Some(inline) => inline.to_string(),
                None => std::fs::read_to_string(&args[0])?.trim().to_string(),
            };
            return Ok(Command::Custom {
                template,
                args: args[1..].to_vec(),
            });
        }
        // The action group is required, so clap rejects this earlier.
        Err(Error::invalid_parameter("action", "no action selected"))
    }
}

/// Split an optional `[TIMEOUT [MESSAGE]]` argument pair.
fn timed_args(args: &[String]) -> Result<(Option<u32>, String)> {
    let timeout = match args.first() {
        None => None,
        Some(raw) => Some(raw.parse().map_err(|_| {
            Error::invalid_parameter("timeout", format!("'{raw}' is not a number of seconds"))
        })?),
    };
    let message = args.get(1).cloned().unwrap_or_default();
    Ok((timeout, message))
}

/// The option string accepted by `--setting`, e.g.
/// `--audio --playback-volume 50 --password --password-value 1234`
#[derive(Parser, Debug)]
#[command(name = "setting", no_binary_name = true)]
pub struct SettingArgs {
    /// Apply the network group
    #[arg(long)]
    pub network: bool,

    /// Transmission reliability: low, medium, high
    #[arg(long, default_value = "medium")]
    pub transmission_reliability: Reliability,

    /// Offline lag detection threshold, seconds
    #[arg(long, default_value_t = 10)]
    pub offline_lag_time_detection: u32,

    /// Apply the audio group
    #[arg(long)]
    pub audio: bool,

    #[arg(long)]
    pub playback_mute: bool,

    #[arg(long)]
    pub recording_mute: bool,

    /// Recording volume, 0-100
    #[arg(long, default_value_t = 80)]
    pub recording_volume: u32,

    /// Playback volume, 0-100
    #[arg(long, default_value_t = 80)]
    pub playback_volume: u32,

    /// Apply the password group
    #[arg(long)]
    pub password: bool,

    #[arg(long, default_value = "")]
    pub password_value: String,

    /// disable, enable, auto
    #[arg(long, default_value = "auto")]
    pub preventing_process_termination: TriState,

    /// disable, enable, auto
    #[arg(long, default_value = "auto")]
    pub lock_screen_when_maliciously_offline: TriState,

    /// disable, enable, auto
    #[arg(long, default_value = "auto")]
    pub hide_the_setup_name_button: TriState,
}

impl SettingArgs {
    /// Parse the whitespace-separated option string given to `--setting`.
    pub fn parse_opts(opts: &str) -> Result<Self> {
        Self::try_parse_from(opts.split_whitespace())
            .map_err(|e| Error::invalid_parameter("setting", e.to_string()))
    }

    pub fn into_settings(self) -> Settings {
        Settings {
            network: self.network,
            transmission_reliability: self.transmission_reliability,
            offline_lag_time_detection: self.offline_lag_time_detection,
            audio: self.audio,
            playback_mute: self.playback_mute,
            recording_mute: self.recording_mute,
            recording_volume: self.recording_volume,
            playback_volume: self.playback_volume,
            password: self.password,
            password_value: self.password_value,
            preventing_process_termination: self.preventing_process_termination,
            lock_screen_when_maliciously_offline: self.lock_screen_when_maliciously_offline,
            hide_the_setup_name_button: self.hide_the_setup_name_button,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("jiyu-udp").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_message_action() {
        let cli = parse(&["-t", "10.0.0.1", "-m", "hello"]);
        assert_eq!(cli.action().unwrap(), Command::Message("hello".into()));
        assert_eq!(cli.target_port, 4705);
    }

    #[test]
    fn test_action_group_is_exclusive() {
        let result = Cli::try_parse_from(["jiyu-udp", "-t", "10.0.0.1", "-m", "a", "-w", "b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_action_is_required() {
        assert!(Cli::try_parse_from(["jiyu-udp", "-t", "10.0.0.1"]).is_err());
    }

    #[test]
    fn test_spoof_options_require_teacher_ip() {
        assert!(Cli::try_parse_from(["jiyu-udp", "-t", "10.0.0.1", "-m", "a", "-i", "9"]).is_err());
        assert!(
            Cli::try_parse_from(["jiyu-udp", "-t", "10.0.0.1", "-m", "a", "--teacher-port", "80"])
                .is_err()
        );
        let cli = parse(&["-t", "10.0.0.1", "-m", "a", "-f", "192.168.1.1", "-i", "9"]);
        assert_eq!(cli.teacher_ip, Some(Ipv4Addr::new(192, 168, 1, 1)));
        assert_eq!(cli.ip_id, Some(9));
    }

    #[test]
    fn test_command_wraps_shell() {
        let cli = parse(&["-t", "10.0.0.1", "-c", "calc"]);
        assert_eq!(
            cli.action().unwrap(),
            Command::Execute {
                program: "cmd.exe".into(),
                arguments: "/D /C \"calc\"".into(),
                mode: WindowMode::Minimize,
            }
        );
    }

    #[test]
    fn test_execute_with_mode() {
        let cli = parse(&[
            "-t",
            "10.0.0.1",
            "-e",
            "notepad.exe",
            "C:\\a.txt",
            "--window-mode",
            "maximize",
        ]);
        assert_eq!(
            cli.action().unwrap(),
            Command::Execute {
                program: "notepad.exe".into(),
                arguments: "C:\\a.txt".into(),
                mode: WindowMode::Maximize,
            }
        );
    }

    #[test]
    fn test_shutdown_variants() {
        let cli = parse(&["-t", "10.0.0.1", "--shutdown"]);
        assert_eq!(
            cli.action().unwrap(),
            Command::Shutdown {
                timeout: None,
                message: String::new(),
                reboot: false,
            }
        );

        let cli = parse(&["-t", "10.0.0.1", "--reboot", "30", "back in a minute"]);
        assert_eq!(
            cli.action().unwrap(),
            Command::Shutdown {
                timeout: Some(30),
                message: "back in a minute".into(),
                reboot: true,
            }
        );

        let cli = parse(&["-t", "10.0.0.1", "--shutdown", "soon"]);
        assert!(cli.action().is_err());
    }

    #[test]
    fn test_rename() {
        let cli = parse(&["-t", "10.0.0.1", "--rename", "lab-07", "3"]);
        assert_eq!(
            cli.action().unwrap(),
            Command::Rename {
                name: "lab-07".into(),
                name_id: 3,
            }
        );

        let cli = parse(&["-t", "10.0.0.1", "--rename", "lab-07", "x"]);
        assert!(cli.action().is_err());
    }

    #[test]
    fn test_setting_defaults_and_overrides() {
        let cli = parse(&["-t", "10.0.0.1", "--setting"]);
        let Command::ApplySettings(settings) = cli.action().unwrap() else {
            panic!("expected settings command");
        };
        assert_eq!(settings, Settings::default());

        let cli = parse(&[
            "-t",
            "10.0.0.1",
            "--setting",
            "--audio --playback-volume 50 --password --password-value 1234",
        ]);
        let Command::ApplySettings(settings) = cli.action().unwrap() else {
            panic!("expected settings command");
        };
        assert!(settings.audio);
        assert_eq!(settings.playback_volume, 50);
        assert!(settings.password);
        assert_eq!(settings.password_value, "1234");
        assert_eq!(settings.recording_volume, 80);

        let cli = parse(&["-t", "10.0.0.1", "--setting", "--bogus"]);
        assert!(cli.action().is_err());
    }

    #[test]
    fn test_hex_strips_whitespace() {
        let cli = parse(&["-t", "10.0.0.1", "--hex", "44 4d 4f 43"]);
        assert_eq!(
            cli.action().unwrap(),
            Command::Custom {
                template: "444d4f43".into(),
                args: Vec::new(),
            }
        );
    }

    #[test]
    fn test_pkg_inline_template() {
        let cli = parse(&["-t", "10.0.0.1", "--pkg", ":444d4f43{0.hex}", "hi"]);
        assert_eq!(
            cli.action().unwrap(),
            Command::Custom {
                template: "444d4f43{0.hex}".into(),
                args: vec!["hi".into()],
            }
        );
    }

    #[test]
    fn test_multiple_targets() {
        let cli = parse(&["-t", "10.0.0.1", "10.0.0.0/30", "-m", "a"]);
        assert_eq!(cli.targets, vec!["10.0.0.1", "10.0.0.0/30"]);
    }

    #[test]
    fn test_overflow_selector() {
        let cli = parse(&["-t", "10.0.0.1", "-m", "a", "--on-overflow", "truncate"]);
        assert_eq!(cli.on_overflow, Overflow::Truncate);
    }
}
