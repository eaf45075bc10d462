//! Frame builders for the classroom-management control protocol
//!
//! One builder per command. Every frame starts with a 4-byte magic tag
//! (`DMOC` for control frames, `GCMN` for rename), a fixed version marker and
//! a little-endian body length, and the layouts below reproduce the observed
//! wire format byte for byte, including the constant middle sections and the
//! zero padding that makes most frame lengths fixed.

use crate::command::{Settings, WindowMode};
use crate::encode::{encode_text, Overflow};
use bytes::{BufMut, BytesMut};
use jiyu_core::{Error, Result};
use rand::RngCore;

/// Magic tag of the control frame family
pub const MAGIC_DMOC: &[u8; 4] = b"DMOC";

/// Magic tag of the rename frame family
pub const MAGIC_GCMN: &[u8; 4] = b"GCMN";

/// Version marker following the magic tag in both families
const VERSION_MARK: [u8; 4] = [0x00, 0x00, 0x01, 0x00];

/// Constant preceding the origin block in every `DMOC` header
const SESSION_MARK: [u8; 4] = [0x20, 0x4E, 0x00, 0x00];

// Origin constants observed per frame kind
const ORIGIN_MESSAGE: [u8; 4] = [0xC0, 0xA8, 0x6C, 0x01];
const ORIGIN_CONTROL: [u8; 4] = [0xC0, 0xA8, 0xE9, 0x01];
const ORIGIN_TOP_WINDOW: [u8; 4] = [0xC0, 0xA8, 0x01, 0x9B];

// Body lengths (frame length minus the 28 bytes of magic, version, length
// field and session token)
const MESSAGE_BODY_LEN: u32 = 0x039E;
const EXECUTE_BODY_LEN: u32 = 0x036E;
const CONTROL_BODY_LEN: u32 = 0x022A;
const TOP_WINDOW_BODY_LEN: u32 = 0x036E;
const SETTINGS_BODY_LEN: u32 = 0x0095;
const RENAME_BODY_LEN: u32 = 0x0044;

// Opcode blocks following the duplicated inner length fields
const OP_MESSAGE: [u8; 12] = [0x00, 0x08, 0, 0, 0, 0, 0, 0, 0x05, 0, 0, 0];
const OP_EXECUTE: [u8; 16] = [0x00, 0x02, 0, 0, 0, 0, 0, 0, 0x0F, 0, 0, 0, 0x01, 0, 0, 0];
const OP_TOP_WINDOW: [u8; 12] = [0x00, 0x02, 0, 0, 0, 0, 0, 0, 0x0E, 0, 0, 0];
const OP_SETTINGS: [u8; 16] = [0x00, 0x40, 0, 0, 0, 0, 0, 0, 0x06, 0, 0, 0, 0x7B, 0, 0, 0];
const OP_TIMED_CONTROL: [u8; 8] = [0x00, 0x02, 0, 0, 0, 0, 0, 0];

// Secondary selectors for the timed-control family
const SEL_SHUTDOWN: [u8; 2] = [0x14, 0x00];
const SEL_REBOOT: [u8; 2] = [0x13, 0x00];
const SEL_CLOSE_WINDOWS: [u8; 2] = [0x02, 0x00];

// Timeout-presence markers
const TIMEOUT_ABSENT: [u8; 2] = [0x00, 0x10];
const TIMEOUT_EXPLICIT: [u8; 2] = [0x00, 0x00];

/// Constant tail of a website frame header
const WEBSITE_TAIL: [u8; 19] = [
    0, 0, 0, 0, 0x02, 0, 0, 0, 0, 0, 0, 0x18, 0, 0, 0, 0, 0, 0, 0,
];

/// Constant identifier block in a rename frame header
const RENAME_IDENT: [u8; 16] = [
    0x66, 0xB1, 0xE4, 0x92, 0x3F, 0x9A, 0x36, 0x4A, 0x94, 0x3A, 0x3D, 0xA3, 0xBD, 0x97, 0x60, 0x41,
];

/// Draw a session token from the thread-local CSPRNG
fn session_token<const N: usize>() -> [u8; N] {
    let mut token = [0u8; N];
    rand::thread_rng().fill_bytes(&mut token);
    token
}

/// Common `DMOC` header: magic, version, body length, 16-byte session token,
/// session mark, origin, and the inner length (`body_len - 13`) twice.
fn dmoc_head(body_len: u32, origin: [u8; 4]) -> BytesMut {
    let mut head = BytesMut::with_capacity(44);
    head.put_slice(MAGIC_DMOC);
    head.put_slice(&VERSION_MARK);
    head.put_u32_le(body_len);
    head.put_slice(&session_token::<16>());
    head.put_slice(&SESSION_MARK);
    head.put_slice(&origin);
    head.put_u32_le(body_len - 13);
    head.put_u32_le(body_len - 13);
    head
}

/// Build a message frame: 800 bytes of text, fixed 954-byte total.
pub fn message(text: &str, policy: Overflow) -> Result<Vec<u8>> {
    let data = encode_text(text, Some(800), policy)?;

    let mut frame = dmoc_head(MESSAGE_BODY_LEN, ORIGIN_MESSAGE);
    frame.put_slice(&OP_MESSAGE);
    frame.put_slice(&data);
    frame.put_bytes(0, 98);
    Ok(frame.to_vec())
}

/// Build an execute frame launching `program` with `arguments`.
pub fn execute(
    program: &str,
    arguments: &str,
    mode: WindowMode,
    policy: Overflow,
) -> Result<Vec<u8>> {
    let path = encode_text(program, Some(512), policy)?;
    let args = encode_text(arguments, Some(254), policy)?;

    let mut frame = dmoc_head(EXECUTE_BODY_LEN, ORIGIN_CONTROL);
    frame.put_slice(&OP_EXECUTE);
    frame.put_slice(&path);
    frame.put_slice(&args);
    frame.put_bytes(0, 66);
    frame.put_slice(&mode.block());
    Ok(frame.to_vec())
}

/// Build a website frame.
///
/// The only variable-length frame: the header carries `len + 36` and, with
/// its bytes rotated left by one position, `len + 23`, both derived from the
/// encoded URL length.
pub fn website(url: &str) -> Result<Vec<u8>> {
    let data = encode_text(url, None, Overflow::Strict)?;

    let outer = data.len() as u32 + 36;
    let inner = (outer - 13).to_le_bytes();
    let rotated = [inner[1], inner[2], inner[3], inner[0]];

    let mut frame = BytesMut::with_capacity(60 + data.len() + 4);
    frame.put_slice(MAGIC_DMOC);
    frame.put_slice(&VERSION_MARK);
    frame.put_u32_le(outer);
    frame.put_slice(&session_token::<25>());
    frame.put_slice(&rotated);
    frame.put_slice(&WEBSITE_TAIL);
    frame.put_slice(&data);
    frame.put_bytes(0, 4);
    Ok(frame.to_vec())
}

/// Shared layout of the shutdown/reboot/close-windows frames.
fn timed_control(
    selector: [u8; 2],
    timeout: Option<u32>,
    message: &str,
    policy: Overflow,
) -> Result<Vec<u8>> {
    let data = encode_text(message, Some(256), policy)?;

    let mut frame = dmoc_head(CONTROL_BODY_LEN, ORIGIN_CONTROL);
    frame.put_slice(&OP_TIMED_CONTROL);
    frame.put_slice(&selector);
    frame.put_slice(if timeout.is_none() {
        &TIMEOUT_ABSENT
    } else {
        &TIMEOUT_EXPLICIT
    });
    frame.put_u32_le(timeout.unwrap_or(0));
    frame.put_slice(&[0x01, 0, 0, 0, 0, 0, 0, 0]);
    frame.put_slice(&data);
    frame.put_bytes(0, 258);
    Ok(frame.to_vec())
}

/// Build a shutdown (or, with `reboot`, a reboot) frame.
pub fn shutdown(
    timeout: Option<u32>,
    message: &str,
    reboot: bool,
    policy: Overflow,
) -> Result<Vec<u8>> {
    let selector = if reboot { SEL_REBOOT } else { SEL_SHUTDOWN };
    timed_control(selector, timeout, message, policy)
}

/// Build a close-all-windows frame.
pub fn close_windows(timeout: Option<u32>, message: &str, policy: Overflow) -> Result<Vec<u8>> {
    timed_control(SEL_CLOSE_WINDOWS, timeout, message, policy)
}

/// Build a close-top-window frame. No payload fields, 850 zero bytes.
pub fn close_top_window() -> Vec<u8> {
    let mut frame = dmoc_head(TOP_WINDOW_BODY_LEN, ORIGIN_TOP_WINDOW);
    frame.put_slice(&OP_TOP_WINDOW);
    frame.put_bytes(0, 850);
    frame.to_vec()
}

/// Build a rename frame (`GCMN` family).
///
/// The name carries a folded terminating NUL and is padded to 64 bytes.
pub fn rename(name: &str, name_id: u32, policy: Overflow) -> Result<Vec<u8>> {
    let mut terminated = String::with_capacity(name.len() + 1);
    terminated.push_str(name);
    terminated.push('\0');
    let data = encode_text(&terminated, Some(64), policy)?;

    let mut frame = BytesMut::with_capacity(96);
    frame.put_slice(MAGIC_GCMN);
    frame.put_slice(&VERSION_MARK);
    frame.put_u32_le(RENAME_BODY_LEN);
    frame.put_slice(&RENAME_IDENT);
    frame.put_u32_le(name_id);
    frame.put_slice(&data);
    Ok(frame.to_vec())
}

/// Build an apply-settings frame.
pub fn apply_settings(settings: &Settings, policy: Overflow) -> Result<Vec<u8>> {
    for (name, volume) in [
        ("recording-volume", settings.recording_volume),
        ("playback-volume", settings.playback_volume),
    ] {
        if volume > 100 {
            return Err(Error::invalid_parameter(
                name,
                format!("volume {volume} out of range (0-100)"),
            ));
        }
    }

    let mut password = String::with_capacity(settings.password_value.len() + 1);
    password.push_str(&settings.password_value);
    password.push('\0');
    let password_data = encode_text(&password, Some(66), policy)?;

    let mut frame = dmoc_head(SETTINGS_BODY_LEN, ORIGIN_CONTROL);
    frame.put_slice(&OP_SETTINGS);

    frame.put_u32_le(settings.network as u32);
    frame.put_u32_le(settings.transmission_reliability as u32);
    frame.put_u32_le(settings.offline_lag_time_detection);

    frame.put_u32_le(settings.audio as u32);
    frame.put_u32_le(settings.playback_mute as u32);
    frame.put_u32_le(settings.recording_mute as u32);
    frame.put_u32_le(settings.recording_volume);
    frame.put_u32_le(settings.playback_volume);

    frame.put_u32_le(settings.password as u32);
    frame.put_slice(&password_data);

    frame.put_u32_le(settings.preventing_process_termination as u32);
    frame.put_u32_le(settings.lock_screen_when_maliciously_offline as u32);
    frame.put_u32_le(settings.hide_the_setup_name_button as u32);

    frame.put_bytes(0, 3);
    Ok(frame.to_vec())
}
