//! RFC 2579 DISPLAY-HINT application.
//!
//! Octet-string hints are a list of `[*]<len><fmt>[sep][term]` specs whose
//! last entry repeats until the data runs out. Integer hints are a single
//! format letter, with `d-N` placing an implied decimal point.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spec {
    star: bool,
    len: usize,
    format: u8,
    sep: Option<char>,
    term: Option<char>,
}

fn parse_specs(hint: &str) -> Option<Vec<Spec>> {
    let bytes = hint.as_bytes();
    let mut specs = Vec::new();
    let mut i = 0;
    let is_plain = |b: u8| !b.is_ascii_digit() && b != b'*';

    while i < bytes.len() {
        let star = bytes[i] == b'*';
        if star {
            i += 1;
        }

        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let len: usize = hint.get(digits_start..i)?.parse().ok()?;
        if len == 0 {
            return None;
        }

        let format = *bytes.get(i)?;
        if !matches!(format, b'd' | b'x' | b'o' | b'a' | b't') {
            return None;
        }
        i += 1;

        let sep = match bytes.get(i) {
            Some(&b) if is_plain(b) => {
                i += 1;
                Some(b as char)
            }
            _ => None,
        };
        let term = match bytes.get(i) {
            Some(&b) if star && is_plain(b) => {
                i += 1;
                Some(b as char)
            }
            _ => None,
        };

        specs.push(Spec {
            star,
            len,
            format,
            sep,
            term,
        });
    }

    Some(specs)
}

fn write_chunk(out: &mut String, format: u8, chunk: &[u8]) {
    let number = || chunk.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    match format {
        b'd' => {
            let _ = write!(out, "{}", number());
        }
        b'o' => {
            let _ = write!(out, "{:o}", number());
        }
        b'x' => {
            for b in chunk {
                let _ = write!(out, "{:02x}", b);
            }
        }
        b't' => out.push_str(&String::from_utf8_lossy(chunk)),
        _ => out.extend(chunk.iter().map(|&b| b as char)),
    }
}

/// Format `data` with an octet-string DISPLAY-HINT.
///
/// Returns `None` when the hint is malformed.
///
/// ```
/// use async_snmp_session::codec::apply_display_hint;
///
/// assert_eq!(apply_display_hint("1x:", &[0, 0x1a, 0x2b]).as_deref(), Some("00:1a:2b"));
/// assert_eq!(apply_display_hint("1d.1d.1d.1d", &[10, 0, 0, 1]).as_deref(), Some("10.0.0.1"));
/// assert_eq!(apply_display_hint("zz", &[1]), None);
/// ```
pub fn apply(hint: &str, data: &[u8]) -> Option<String> {
    let specs = parse_specs(hint)?;
    let last = specs.len().checked_sub(1)?;
    let mut out = String::with_capacity(data.len() * 3);
    let mut pos = 0;
    let mut next = 0;

    while pos < data.len() {
        let spec = specs[next.min(last)];
        next += 1;

        let repeat = if spec.star {
            pos += 1;
            usize::from(data[pos - 1])
        } else {
            1
        };

        for round in 0..repeat {
            if pos >= data.len() {
                break;
            }
            let end = pos.saturating_add(spec.len).min(data.len());
            write_chunk(&mut out, spec.format, &data[pos..end]);
            pos = end;

            let closes_group = spec.term.is_some() && round + 1 == repeat;
            if let Some(sep) = spec.sep
                && pos < data.len()
                && !closes_group
            {
                out.push(sep);
            }
        }

        if let Some(term) = spec.term
            && pos < data.len()
        {
            out.push(term);
        }
    }

    Some(out)
}

/// Largest implied decimal point a `d-N` hint may place.
const MAX_DECIMAL_PLACES: usize = 64;

/// Format an integer with an INTEGER DISPLAY-HINT (`d`, `d-N`, `x`, `o`, `b`).
///
/// ```
/// use async_snmp_session::codec::apply_integer_hint;
///
/// assert_eq!(apply_integer_hint("d-2", 1234).as_deref(), Some("12.34"));
/// assert_eq!(apply_integer_hint("x", 255).as_deref(), Some("ff"));
/// ```
pub fn apply_integer(hint: &str, value: i64) -> Option<String> {
    match hint.as_bytes() {
        [b'd'] => Some(value.to_string()),
        [b'x'] => Some(format!("{:x}", value)),
        [b'o'] => Some(format!("{:o}", value)),
        [b'b'] => Some(format!("{:b}", value)),
        [b'd', b'-', rest @ ..] => {
            let places: usize = std::str::from_utf8(rest).ok()?.parse().ok()?;
            if places > MAX_DECIMAL_PLACES {
                return None;
            }
            let digits = value.unsigned_abs().to_string();
            let padded = format!("{:0>width$}", digits, width = places + 1);
            let (whole, frac) = padded.split_at(padded.len() - places);
            let sign = if value < 0 { "-" } else { "" };
            if places == 0 {
                Some(format!("{}{}", sign, whole))
            } else {
                Some(format!("{}{}.{}", sign, whole, frac))
            }
        }
        _ => None,
    }
}
