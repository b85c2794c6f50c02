//! Value codec: wire values to result strings and SET strings to wire values.
//!
//! Rendering has three modes (see [`RenderMode`]). Parsing never aborts the
//! request it is building: a failed parse still yields a placeholder value
//! so the caller can report every bad value at once.

pub(crate) mod agent;
pub mod hex;
mod hint;

pub use hint::{apply as apply_display_hint, apply_integer as apply_integer_hint};

use crate::mib::{MibNode, MibTree};
use crate::oid::{self, Oid};
use crate::types::SnmpType;
use crate::value::Value;
use bytes::Bytes;
use std::borrow::Cow;
use std::net::Ipv4Addr;

/// Octet strings longer than this are silently truncated when rendered.
pub const MAX_VALUE_SIZE: usize = 65536;

/// How values are turned into result strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderMode {
    /// Plain numeric and string forms.
    #[default]
    Basic,
    /// Like `Basic`, but INTEGERs with a matching enumeration label render
    /// as the label.
    Enum,
    /// The MIB's own textual rendering, see [`MibTree::format_value`].
    AgentFormatted,
}

/// Render a response value.
pub fn render<M: MibTree + ?Sized>(
    mib: &M,
    oid: &Oid,
    value: &Value,
    node: Option<&MibNode>,
    mode: RenderMode,
) -> String {
    match mode {
        RenderMode::AgentFormatted => mib.format_value(oid, value, node),
        RenderMode::Enum => match (value, node) {
            (Value::Integer(v), Some(node)) => match node.enum_label(*v) {
                Some(label) => label.to_string(),
                None => render_basic(value),
            },
            _ => render_basic(value),
        },
        RenderMode::Basic => render_basic(value),
    }
}

/// Render without MIB knowledge.
///
/// ```
/// use async_snmp_session::codec::render_basic;
/// use async_snmp_session::value::Value;
///
/// assert_eq!(render_basic(&Value::Gauge32(42)), "42");
/// assert_eq!(render_basic(&Value::IpAddress([10, 0, 0, 1])), "10.0.0.1");
/// assert_eq!(render_basic(&Value::EndOfMibView), "ENDOFMIBVIEW");
/// ```
pub fn render_basic(value: &Value) -> String {
    match value {
        Value::Integer(v) => v.to_string(),
        Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) | Value::UInteger32(v) => {
            v.to_string()
        }
        Value::OctetString(data) | Value::Opaque(data) => latin1_decode(data),
        Value::IpAddress([a, b, c, d]) => format!("{}.{}.{}.{}", a, b, c, d),
        Value::Null => String::new(),
        Value::ObjectIdentifier(oid) => oid.to_dotted(),
        Value::Counter64(v) | Value::OpaqueCounter64(v) | Value::OpaqueU64(v) => v.to_string(),
        Value::OpaqueI64(v) => v.to_string(),
        Value::OpaqueFloat(v) => format!("{:.6}", v),
        Value::OpaqueDouble(v) => format!("{:.6}", v),
        Value::BitString(data) => bit_list(data, None),
        Value::EndOfMibView => "ENDOFMIBVIEW".to_string(),
        Value::NoSuchObject => "NOSUCHOBJECT".to_string(),
        Value::NoSuchInstance => "NOSUCHINSTANCE".to_string(),
        Value::Unknown { tag, .. } => {
            tracing::error!(
                target: "async_snmp_session::codec",
                { tag = *tag },
                "unknown value type, rendering empty"
            );
            String::new()
        }
    }
}

/// Hex octets followed by one entry per set bit, most significant bit of
/// the first octet being bit 0. With a node, bits with a label render as
/// `label(n)`.
pub(crate) fn bit_list(data: &[u8], node: Option<&MibNode>) -> String {
    let mut out = hex::spaced(data);
    for (octet, byte) in data.iter().enumerate() {
        for bit in 0..8 {
            if byte & (0x80 >> bit) == 0 {
                continue;
            }
            let n = octet * 8 + bit;
            out.push(' ');
            match node.and_then(|node| i32::try_from(n).ok().and_then(|n| node.enum_label(n))) {
                Some(label) => out.push_str(&format!("{}({})", label, n)),
                None => out.push_str(&n.to_string()),
            }
        }
    }
    out
}

/// Each byte becomes the char with the same code point.
fn latin1_decode(data: &[u8]) -> String {
    data[..data.len().min(MAX_VALUE_SIZE)]
        .iter()
        .map(|&b| b as char)
        .collect()
}

/// Inverse of [`latin1_decode`]; fails on any char above U+00FF.
fn latin1_encode(s: &str) -> Option<Bytes> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect::<Option<Vec<u8>>>()
        .map(Bytes::from)
}

/// A SET value that could not be converted.
///
/// `placeholder` is the zero value the request is built with so that the
/// remaining values can still be checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub placeholder: Value,
}

/// Convert a caller-supplied SET string to a wire value of type `ty`.
///
/// ```
/// use async_snmp_session::codec::parse;
/// use async_snmp_session::mib::MibTable;
/// use async_snmp_session::types::SnmpType;
/// use async_snmp_session::value::Value;
///
/// let mib = MibTable::well_known();
/// assert_eq!(parse(&mib, Some("0x10"), SnmpType::Integer), Ok(Value::Integer(16)));
/// assert_eq!(parse(&mib, Some("7"), SnmpType::Gauge), Ok(Value::Gauge32(7)));
/// assert!(parse(&mib, None, SnmpType::OctetStr).is_err());
/// ```
pub fn parse<M: MibTree + ?Sized>(
    mib: &M,
    input: Option<&str>,
    ty: SnmpType,
) -> Result<Value, ParseError> {
    let fail = |placeholder: Value| Err(ParseError { placeholder });

    match ty {
        SnmpType::Integer | SnmpType::Integer32 => {
            match input.and_then(parse_c_integer).and_then(|v| i32::try_from(v).ok()) {
                Some(v) => Ok(Value::Integer(v)),
                None => fail(Value::Integer(0)),
            }
        }
        SnmpType::Unsigned32 | SnmpType::Gauge => unsigned(input, Value::Gauge32),
        SnmpType::Counter => unsigned(input, Value::Counter32),
        SnmpType::TimeTicks => unsigned(input, Value::TimeTicks),
        SnmpType::UInteger => unsigned(input, Value::UInteger32),
        SnmpType::OctetStr | SnmpType::BitString | SnmpType::Opaque => {
            match input.and_then(latin1_encode) {
                Some(bytes) => Ok(Value::OctetString(bytes)),
                None => fail(Value::OctetString(Bytes::new())),
            }
        }
        SnmpType::IpAddr => match input.and_then(|s| s.trim().parse::<Ipv4Addr>().ok()) {
            Some(addr) => Ok(Value::from(addr)),
            None => fail(Value::IpAddress([0; 4])),
        },
        SnmpType::ObjectId => match input.and_then(|s| parse_object_id(mib, s)) {
            Some(oid) => Ok(Value::ObjectIdentifier(oid)),
            None => fail(Value::Null),
        },
        _ => fail(Value::Null),
    }
}

fn unsigned(input: Option<&str>, wrap: fn(u32) -> Value) -> Result<Value, ParseError> {
    match input.and_then(|s| s.trim().parse::<u32>().ok()) {
        Some(v) => Ok(wrap(v)),
        None => Err(ParseError {
            placeholder: wrap(0),
        }),
    }
}

fn parse_object_id<M: MibTree + ?Sized>(mib: &M, s: &str) -> Option<Oid> {
    if oid::is_numeric_tag(s) {
        return oid::parse_numeric(s).ok();
    }
    mib.parse_long_name(s)
        .or_else(|| mib.find_node(s).map(|node| node.oid.clone()))
}

/// Integer in C literal syntax: optional sign, then `0x` hex, leading-zero
/// octal or decimal. Surrounding whitespace is ignored; anything else left
/// over fails.
fn parse_c_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, body) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()?
    } else if body.len() > 1 && body.starts_with('0') {
        i64::from_str_radix(&body[1..], 8).ok()?
    } else {
        body.parse::<i64>().ok()?
    };
    // from_str_radix accepts its own sign; reject "--1" and "0x-1"
    if body.contains(['+', '-']) {
        return None;
    }
    Some(if negative { -magnitude } else { magnitude })
}

/// Replace an enumeration label with its number when `node` defines it.
///
/// Numbers and unknown labels pass through unchanged.
pub fn resolve_enum_label<'a>(input: &'a str, node: Option<&MibNode>) -> Cow<'a, str> {
    match node.and_then(|node| node.enum_number(input)) {
        Some(n) => Cow::Owned(n.to_string()),
        None => Cow::Borrowed(input),
    }
}
