//! Hexadecimal helpers.

use std::fmt::Write;

/// Encode bytes as lowercase hex with no separators.
///
/// ```
/// use async_snmp_session::codec::hex::encode;
///
/// assert_eq!(encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// Uppercase hex octets separated by spaces, the agent's `Hex-STRING` form.
///
/// ```
/// use async_snmp_session::codec::hex::spaced;
///
/// assert_eq!(spaced(&[0x00, 0x1a, 0xff]), "00 1A FF");
/// ```
pub fn spaced(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02X}", b);
    }
    out
}
