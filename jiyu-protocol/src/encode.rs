//! Wide-character text encoding shared by every frame builder
//!
//! The target protocol carries text as 2-byte little-endian code units
//! (UTF-16LE). Length-bounded fields are right-padded with zero bytes to
//! their exact declared width; oversized input is handled according to a
//! caller-selected [`Overflow`] policy.

use jiyu_core::{Error, Result};
use std::str::FromStr;
use tracing::warn;

/// Policy for text that exceeds a field's byte width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Fail with [`Error::TooLong`]
    #[default]
    Strict,
    /// Truncate and emit a warning
    Warn,
    /// Truncate silently
    Truncate,
}

impl FromStr for Overflow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(Overflow::Strict),
            "warn" => Ok(Overflow::Warn),
            "truncate" => Ok(Overflow::Truncate),
            other => Err(Error::invalid_parameter(
                "overflow",
                format!("unknown policy '{other}' (expected strict, warn or truncate)"),
            )),
        }
    }
}

/// Encode `text` as UTF-16LE bytes.
///
/// With `max` given, the result is always exactly `max` bytes: shorter text
/// is zero-padded, longer text is rejected or truncated per `policy`.
pub fn encode_text(text: &str, max: Option<usize>, policy: Overflow) -> Result<Vec<u8>> {
    let mut data: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();

    let Some(max) = max else {
        return Ok(data);
    };
    if max == 0 {
        return Err(Error::invalid_parameter(
            "max",
            "field width must be positive",
        ));
    }

    if data.len() > max {
        match policy {
            Overflow::Strict => {
                return Err(Error::TooLong {
                    len: data.len(),
                    max,
                })
            }
            Overflow::Warn => {
                warn!(len = data.len(), max, "text truncated to field width");
                data.truncate(max);
            }
            Overflow::Truncate => data.truncate(max),
        }
    }

    data.resize(max, 0);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_unbounded() {
        let data = encode_text("Hi", None, Overflow::Strict).unwrap();
        assert_eq!(data, vec![0x48, 0x00, 0x69, 0x00]);
    }

    #[test]
    fn test_encode_pads_to_exact_width() {
        for n in [2, 6, 800] {
            let data = encode_text("A", Some(n), Overflow::Strict).unwrap();
            assert_eq!(data.len(), n);
            assert_eq!(data[0], 0x41);
            assert!(data[2..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_encode_non_ascii() {
        // U+4F60 -> 60 4F in little-endian order
        let data = encode_text("\u{4f60}", Some(4), Overflow::Strict).unwrap();
        assert_eq!(data, vec![0x60, 0x4F, 0x00, 0x00]);
    }

    #[test]
    fn test_encode_strict_rejects_overflow() {
        let err = encode_text("hello", Some(4), Overflow::Strict).unwrap_err();
        assert!(matches!(err, Error::TooLong { len: 10, max: 4 }));
    }

    #[test]
    fn test_encode_truncate_overflow() {
        let data = encode_text("hello", Some(4), Overflow::Truncate).unwrap();
        assert_eq!(data, vec![0x68, 0x00, 0x65, 0x00]);
    }

    #[test]
    fn test_encode_warn_truncates_too() {
        let data = encode_text("hello", Some(4), Overflow::Warn).unwrap();
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_encode_zero_width_rejected() {
        assert!(encode_text("", Some(0), Overflow::Strict).is_err());
    }

    #[test]
    fn test_overflow_from_str() {
        assert_eq!(Overflow::from_str("strict").unwrap(), Overflow::Strict);
        assert_eq!(Overflow::from_str("warn").unwrap(), Overflow::Warn);
        assert_eq!(Overflow::from_str("truncate").unwrap(), Overflow::Truncate);
        assert!(Overflow::from_str("maybe").is_err());
    }
}
