//! Target specification expansion
//!
//! Turns a compact target specification into concrete addresses:
//!
//! - a single address: `192.168.1.10`
//! - a CIDR block: `192.168.1.0/24` (mask 16-32; the whole block is
//!   enumerated inclusively, network and broadcast addresses included)
//! - per-octet dashed ranges: `192.168.1-2.1-100` (Cartesian product,
//!   first octet outermost)
//!
//! Expansion is a pure function. The resolved count is capped at 65536
//! addresses to bound fan-out, which is also why masks below 16 are
//! rejected.

use jiyu_core::{Error, Result};
use std::net::Ipv4Addr;

/// Hard cap on the number of addresses a specification may resolve to
pub const MAX_EXPANSION: usize = 65536;

/// Smallest accepted CIDR mask
pub const MIN_MASK: u32 = 16;

/// Expand a target specification into a list of addresses.
pub fn expand(spec: &str) -> Result<Vec<Ipv4Addr>> {
    let spec: String = spec.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some((addr, mask)) = spec.split_once('/') {
        return expand_cidr(addr, mask);
    }
    if spec.contains('-') {
        return expand_ranges(&spec);
    }
    Ok(vec![parse_addr(&spec)?])
}

/// Enumerate a CIDR block in ascending numeric order.
fn expand_cidr(addr: &str, mask: &str) -> Result<Vec<Ipv4Addr>> {
    let mask: u32 = mask.parse().map_err(|_| {
        Error::invalid_address(addr, format!("subnet mask '{mask}' is not an integer"))
    })?;
    if !(MIN_MASK..=32).contains(&mask) {
        return Err(Error::InvalidMask(mask));
    }

    let host_bits = 32 - mask;
    let base = u32::from(parse_addr(addr)?);
    let network = if host_bits == 0 {
        base
    } else {
        base & (u32::MAX << host_bits)
    };
    let broadcast = if host_bits == 0 {
        network
    } else {
        network | ((1u32 << host_bits) - 1)
    };

    Ok((network..=broadcast).map(Ipv4Addr::from).collect())
}

/// Enumerate the Cartesian product of four per-octet ranges.
fn expand_ranges(spec: &str) -> Result<Vec<Ipv4Addr>> {
    let segments: Vec<&str> = spec.split('.').collect();
    if segments.len() != 4 {
        return Err(Error::invalid_address(spec, "expected four octets"));
    }

    let mut bounds = [(0u8, 0u8); 4];
    let mut count: usize = 1;
    for (slot, segment) in bounds.iter_mut().zip(&segments) {
        *slot = match segment.split_once('-') {
            None => {
                let value = parse_octet(spec, segment)?;
                (value, value)
            }
            Some((low, high)) => {
                let low = parse_octet(spec, low)?;
                let high = parse_octet(spec, high)?;
                if low > high {
                    return Err(Error::invalid_address(
                        spec,
                        format!("invalid range {low}-{high}"),
                    ));
                }
                (low, high)
            }
        };
        count *= (slot.1 - slot.0) as usize + 1;
    }

    if count > MAX_EXPANSION {
        return Err(Error::RangeTooLarge(count));
    }

    let mut addrs = Vec::with_capacity(count);
    for a in bounds[0].0..=bounds[0].1 {
        for b in bounds[1].0..=bounds[1].1 {
            for c in bounds[2].0..=bounds[2].1 {
                for d in bounds[3].0..=bounds[3].1 {
                    addrs.push(Ipv4Addr::new(a, b, c, d));
                }
            }
        }
    }
    Ok(addrs)
}

fn parse_addr(addr: &str) -> Result<Ipv4Addr> {
    let parts: Vec<&str> = addr.split('.').collect();
    if parts.len() != 4 {
        return Err(Error::invalid_address(addr, "expected four octets"));
    }
    let mut octets = [0u8; 4];
    for (octet, part) in octets.iter_mut().zip(&parts) {
        *octet = parse_octet(addr, part)?;
    }
    Ok(Ipv4Addr::from(octets))
}

fn parse_octet(spec: &str, text: &str) -> Result<u8> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_address(
            spec,
            format!("octet '{text}' is not a number"),
        ));
    }
    match text.parse::<u16>() {
        Ok(value) if value <= 255 => Ok(value as u8),
        _ => Err(Error::invalid_address(
            spec,
            format!("octet {text} out of range (0-255)"),
        )),
    }
}
