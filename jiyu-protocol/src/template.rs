//! Hex-template micro-interpreter for ad-hoc frames
//!
//! A template is hex text with `{...}` placeholders. A placeholder names a
//! positional argument by index, or the special `rand16` generator, followed
//! by a chain of transform suffixes:
//!
//! ```text
//! {0}              argument text, verbatim
//! {0.hex}          UTF-8 bytes of the text, hex encoded
//! {0.len}          character count, as a decimal integer
//! {0.int}          parse as base-10 integer      {0.int_16}  other bases
//! {0.size_800}     wide-character encoding padded to 800 bytes, hex encoded
//! {0.int.little_4} 4-byte little-endian encoding {….big_4}   big-endian
//! {0.int.add_36}   arithmetic on an integer view (add/sub/mul/div/mod)
//! {rand16}         one random byte, hex encoded; fresh bytes per occurrence
//! {rand16[5]}      five random bytes             {rand16.size_16}  sixteen
//! ```
//!
//! Resolution runs over a tagged value (text view or integer view) with a
//! fixed dispatch table per suffix; there is no operator precedence and no
//! branching. The fully substituted string must decode as hex. Unknown
//! suffixes or malformed numbers fail with an error naming the offending
//! expression.

use crate::encode::{encode_text, Overflow};
use jiyu_core::{Error, Result};
use rand::RngCore;

/// Intermediate value during placeholder resolution
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Text(String),
    Int(u64),
}

impl Value {
    /// Render into the output string: text verbatim, integers in decimal
    fn render(self) -> String {
        match self {
            Value::Text(text) => text,
            Value::Int(value) => value.to_string(),
        }
    }
}

/// Expand `template` against `args`, drawing random bytes from the
/// thread-local CSPRNG.
pub fn expand(template: &str, args: &[String]) -> Result<Vec<u8>> {
    expand_with_rng(template, args, &mut rand::thread_rng())
}

/// Expand with a caller-supplied random generator.
///
/// The generator is invoked once per textual `rand16` occurrence, so two
/// occurrences yield different bytes.
pub fn expand_with_rng<R: RngCore>(
    template: &str,
    args: &[String],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut expr = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => expr.push(ch),
                        None => {
                            return Err(Error::invalid_template(
                                expr,
                                "unterminated placeholder".to_string(),
                            ))
                        }
                    }
                }
                out.push_str(&resolve(&expr, args, rng)?);
            }
            '}' => {
                return Err(Error::invalid_template(
                    template,
                    "unmatched closing brace".to_string(),
                ))
            }
            _ => out.push(c),
        }
    }

    hex::decode(&out)
        .map_err(|e| Error::invalid_template(template, format!("expansion is not valid hex: {e}")))
}

/// Resolve one placeholder expression to its output text.
fn resolve<R: RngCore>(expr: &str, args: &[String], rng: &mut R) -> Result<String> {
    let head_len = expr
        .find(|c| c == '.' || c == '[')
        .unwrap_or(expr.len());
    let (head, chain) = expr.split_at(head_len);

    if head == "rand16" {
        return resolve_random(expr, chain, rng);
    }

    let index: usize = head.parse().map_err(|_| {
        Error::invalid_template(expr, "placeholder must be an argument index or rand16")
    })?;
    let arg = args
        .get(index)
        .ok_or_else(|| Error::invalid_template(expr, format!("argument {index} out of range")))?;

    if chain.contains('[') {
        return Err(Error::invalid_template(
            expr,
            "subscripting is only valid on rand16",
        ));
    }

    let mut value = Value::Text(arg.clone());
    for suffix in chain.split('.').skip(1) {
        value = apply(value, suffix, expr)?;
    }
    Ok(value.render())
}

/// Apply one transform suffix to a value.
fn apply(value: Value, suffix: &str, expr: &str) -> Result<Value> {
    match value {
        Value::Text(text) => apply_text(text, suffix, expr),
        Value::Int(int) => apply_int(int, suffix, expr),
    }
}

fn apply_text(text: String, suffix: &str, expr: &str) -> Result<Value> {
    match suffix {
        "len" => Ok(Value::Int(text.chars().count() as u64)),
        "hex" => Ok(Value::Text(hex::encode(text.as_bytes()))),
        "int" => parse_int(&text, 10, expr),
        _ => {
            if let Some(base) = suffix.strip_prefix("int_") {
                let base = parse_number(base, expr)?;
                if !(2..=36).contains(&base) {
                    return Err(Error::invalid_template(
                        expr,
                        format!("unsupported base {base}"),
                    ));
                }
                parse_int(&text, base as u32, expr)
            } else if let Some(width) = suffix.strip_prefix("size_") {
                let width = parse_number(width, expr)? as usize;
                let encoded = encode_text(&text, Some(width), Overflow::Strict)
                    .map_err(|e| Error::invalid_template(expr, e.to_string()))?;
                Ok(Value::Text(hex::encode(encoded)))
            } else {
                Err(Error::invalid_template(
                    expr,
                    format!("unknown text suffix '{suffix}'"),
                ))
            }
        }
    }
}

fn apply_int(value: u64, suffix: &str, expr: &str) -> Result<Value> {
    let (name, operand) = match suffix.split_once('_') {
        Some((name, operand)) => (name, operand),
        None => {
            return Err(Error::invalid_template(
                expr,
                format!("unknown integer suffix '{suffix}'"),
            ))
        }
    };
    let operand = parse_number(operand, expr)?;

    let arithmetic = |result: Option<u64>| {
        result.map(Value::Int).ok_or_else(|| {
            Error::invalid_template(expr, format!("arithmetic failed in '{suffix}'"))
        })
    };

    match name {
        "little" => Ok(Value::Text(hex::encode(int_bytes(
            value,
            operand as usize,
            false,
            expr,
        )?))),
        "big" => Ok(Value::Text(hex::encode(int_bytes(
            value,
            operand as usize,
            true,
            expr,
        )?))),
        "add" => arithmetic(value.checked_add(operand)),
        "sub" => arithmetic(value.checked_sub(operand)),
        "mul" => arithmetic(value.checked_mul(operand)),
        "div" => arithmetic(value.checked_div(operand)),
        "mod" => arithmetic(value.checked_rem(operand)),
        _ => Err(Error::invalid_template(
            expr,
            format!("unknown integer suffix '{suffix}'"),
        )),
    }
}

/// Fixed-width integer encoding, little- or big-endian.
fn int_bytes(value: u64, width: usize, big: bool, expr: &str) -> Result<Vec<u8>> {
    if width < 8 && value >> (8 * width as u32) != 0 {
        return Err(Error::invalid_template(
            expr,
            format!("{value} does not fit in {width} bytes"),
        ));
    }

    let le = value.to_le_bytes();
    let mut bytes = vec![0u8; width];
    let copied = width.min(8);
    bytes[..copied].copy_from_slice(&le[..copied]);
    if big {
        bytes.reverse();
    }
    Ok(bytes)
}

fn parse_int(text: &str, base: u32, expr: &str) -> Result<Value> {
    u64::from_str_radix(text.trim(), base)
        .map(Value::Int)
        .map_err(|_| Error::invalid_template(expr, format!("'{text}' is not a base-{base} integer")))
}

fn parse_number(text: &str, expr: &str) -> Result<u64> {
    text.parse()
        .map_err(|_| Error::invalid_template(expr, format!("malformed number '{text}'")))
}

/// Resolve the `rand16` generator: bare, subscripted, or `.size_<N>`.
fn resolve_random<R: RngCore>(expr: &str, chain: &str, rng: &mut R) -> Result<String> {
    let count = if chain.is_empty() {
        1
    } else if let Some(rest) = chain.strip_prefix('[') {
        let Some(subscript) = rest.strip_suffix(']') else {
            return Err(Error::invalid_template(expr, "unterminated subscript"));
        };
        let count = parse_number(subscript, expr)? as usize;
        if count == 0 {
            return Err(Error::invalid_template(expr, "subscript must be positive"));
        }
        count
    } else if let Some(width) = chain.strip_prefix(".size_") {
        parse_number(width, expr)? as usize
    } else {
        return Err(Error::invalid_template(
            expr,
            format!("unknown rand16 accessor '{chain}'"),
        ));
    };

    let mut bytes = vec![0u8; count];
    rng.fill_bytes(&mut bytes);
    Ok(hex::encode(bytes))
}
