//! Hex byte string utilities.

use crate::error::ReferenceError;

/// Parses a single hex byte written as `HH` or `0xHH`.
pub fn parse_hex_byte(s: &str) -> Result<u8, ReferenceError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u8::from_str_radix(digits, 16).map_err(|_| ReferenceError::InvalidHexByte(s.to_string()))
}

/// Parses a separator-delimited list of hex bytes (e.g. `0F_AF`).
pub fn parse_separated_hex_bytes(s: &str, sep: char) -> Result<Vec<u8>, ReferenceError> {
    s.split(sep).map(parse_hex_byte).collect()
}

/// Renders bytes as space-separated lowercase hex pairs.
pub fn hexdump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
