//! Hexadecimal helpers for keys, payloads and identities.
//!
//! Output is uppercase (two hex characters per byte, no separators), matching
//! the wire format delivered to callers. Parsing accepts either case and
//! ignores ASCII whitespace.

use crate::{Error, Result};

/// Convert a byte slice to an uppercase hex string without separators.
///
/// Example: `&[0xde, 0xad]` -> `"DEAD"`
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        use std::fmt::Write;
        // write! never fails writing to a String
        let _ = write!(&mut s, "{:02X}", b);
    }
    s
}

/// Parse a hex string into bytes.
///
/// Accepts uppercase or lowercase digits, with or without ASCII whitespace.
/// Works on raw bytes, so anything outside the hex alphabet (including
/// multi-byte characters) is rejected instead of tripping a slice boundary.
pub fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = s
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    if cleaned.len() % 2 != 0 {
        return Err(Error::Argument(format!(
            "hex string has odd length ({})",
            cleaned.len()
        )));
    }

    let mut out = Vec::with_capacity(cleaned.len() / 2);
    for pair in cleaned.chunks_exact(2) {
        out.push((hex_digit(pair[0])? << 4) | hex_digit(pair[1])?);
    }
    Ok(out)
}

fn hex_digit(b: u8) -> Result<u8> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(Error::Argument(format!(
            "invalid hex character (byte 0x{:02X})",
            b
        ))),
    }
}
