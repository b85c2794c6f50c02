//! MIB-aware value text, the default behind [`MibTree::format_value`].
//!
//! [`MibTree::format_value`]: crate::mib::MibTree::format_value

use super::{bit_list, hex, hint};
use crate::mib::MibNode;
use crate::types::SnmpType;
use crate::value::Value;

pub(crate) fn format(value: &Value, node: Option<&MibNode>) -> String {
    let display_hint = node.and_then(|n| n.hint.as_deref());
    match value {
        Value::Integer(v) => {
            if let Some(label) = node.and_then(|n| n.enum_label(*v)) {
                return format!("{}({})", label, v);
            }
            display_hint.and_then(|h| hint::apply_integer(h, i64::from(*v)))
                .unwrap_or_else(|| v.to_string())
        }
        Value::TimeTicks(v) => timeticks(*v),
        Value::Gauge32(v) | Value::UInteger32(v) => display_hint
            .and_then(|h| hint::apply_integer(h, i64::from(*v)))
            .unwrap_or_else(|| v.to_string()),
        Value::Counter32(v) => v.to_string(),
        Value::OctetString(data) => {
            if node.and_then(|n| n.ty) == Some(SnmpType::BitString) {
                return bit_list(data, node);
            }
            if let Some(text) = display_hint.and_then(|h| hint::apply(h, data)) {
                return text;
            }
            match std::str::from_utf8(data) {
                Ok(s) if s.chars().all(|c| !c.is_control() || c.is_ascii_whitespace()) => {
                    s.to_string()
                }
                _ => hex::spaced(data),
            }
        }
        Value::BitString(data) => bit_list(data, node),
        Value::Opaque(data) => hex::spaced(data),
        Value::Null => "NULL".to_string(),
        Value::NoSuchObject => "No Such Object available on this agent at this OID".to_string(),
        Value::NoSuchInstance => "No Such Instance currently exists at this OID".to_string(),
        Value::EndOfMibView => {
            "No more variables left in this MIB View (It is past the end of the MIB tree)"
                .to_string()
        }
        Value::Unknown { data, .. } => hex::spaced(data),
        other => super::render_basic(other),
    }
}

/// `days:hours:minutes:seconds.hundredths`
fn timeticks(ticks: u32) -> String {
    let centis = ticks % 100;
    let secs = ticks / 100;
    format!(
        "{}:{}:{:02}:{:02}.{:02}",
        secs / 86400,
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60,
        centis
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use bytes::Bytes;

    #[test]
    fn test_timeticks() {
        assert_eq!(format(&Value::TimeTicks(0), None), "0:0:00:00.00");
        assert_eq!(format(&Value::TimeTicks(12345), None), "0:0:02:03.45");
        assert_eq!(format(&Value::TimeTicks(8_640_000 + 360_000 + 6_100), None), "1:1:01:01.00");
    }

    #[test]
    fn test_enum_with_number() {
        let node = MibNode::new(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 8), "ifOperStatus", Some(SnmpType::Integer))
            .enum_value(1, "up");
        assert_eq!(format(&Value::Integer(1), Some(&node)), "up(1)");
        assert_eq!(format(&Value::Integer(4), Some(&node)), "4");
    }

    #[test]
    fn test_octet_strings() {
        let mac = MibNode::new(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 6), "ifPhysAddress", Some(SnmpType::OctetStr))
            .hint("1x:");
        let data = Value::OctetString(Bytes::from_static(&[0, 0x1a, 0x2b]));
        assert_eq!(format(&data, Some(&mac)), "00:1a:2b");
        assert_eq!(format(&data, None), "00 1A 2B");
        assert_eq!(format(&Value::from("eth0"), None), "eth0");
    }

    #[test]
    fn test_bits_typed_octet_string() {
        let node = MibNode::new(oid!(1, 3, 6, 1, 4, 1, 1), "flags", Some(SnmpType::BitString))
            .enum_value(1, "beta");
        let value = Value::OctetString(Bytes::from_static(&[0x40]));
        assert_eq!(format(&value, Some(&node)), "40 beta(1)");
    }

    #[test]
    fn test_exceptions_and_null() {
        assert_eq!(format(&Value::Null, None), "NULL");
        assert_eq!(
            format(&Value::NoSuchInstance, None),
            "No Such Instance currently exists at this OID"
        );
        assert!(format(&Value::EndOfMibView, None).starts_with("No more variables"));
    }
}
