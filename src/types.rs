//! Semantic SNMP types and their names.
//!
//! Three vocabularies meet here: the wire tag the engine reports for a
//! value, the symbolic names results carry (`"OCTETSTR"`, `"TICKS"`, ...)
//! and the type strings callers pass to SET, which may be full keywords or
//! single-letter shorthands.

use crate::tag;
use std::fmt;

/// Semantic type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SnmpType {
    ObjectId,
    OctetStr,
    Integer,
    /// SMIv2 Integer32.
    Integer32,
    Unsigned32,
    NetAddr,
    IpAddr,
    Counter,
    Gauge,
    TimeTicks,
    Opaque,
    Counter64,
    Null,
    BitString,
    UInteger,
    NotifType,
    TrapType,
    EndOfMibView,
    NoSuchObject,
    NoSuchInstance,
    /// A wire tag outside the known set.
    Other,
}

// Ordered: INTEGER32 must be tried before INTEGER, and "COUNTER" alone is
// checked exactly before the three-letter "COU" prefix claims COUNTER64.
const KEYWORDS: &[(&str, usize, SnmpType)] = &[
    ("INTEGER32", 8, SnmpType::Integer32),
    ("INTEGER", 3, SnmpType::Integer),
    ("UNSIGNED32", 3, SnmpType::Unsigned32),
    ("COUNTER", 0, SnmpType::Counter),
    ("GAUGE", 3, SnmpType::Gauge),
    ("IPADDR", 3, SnmpType::IpAddr),
    ("OCTETSTR", 3, SnmpType::OctetStr),
    ("TICKS", 3, SnmpType::TimeTicks),
    ("OPAQUE", 3, SnmpType::Opaque),
    ("OBJECTID", 3, SnmpType::ObjectId),
    ("NETADDR", 3, SnmpType::NetAddr),
    ("COUNTER64", 3, SnmpType::Counter64),
    ("NULL", 3, SnmpType::Null),
    ("BITS", 3, SnmpType::BitString),
    ("ENDOFMIBVIEW", 3, SnmpType::EndOfMibView),
    ("NOSUCHOBJECT", 7, SnmpType::NoSuchObject),
    ("NOSUCHINSTANCE", 7, SnmpType::NoSuchInstance),
    ("UINTEGER", 3, SnmpType::UInteger),
    ("NOTIF", 3, SnmpType::NotifType),
    ("TRAP", 4, SnmpType::TrapType),
];

impl SnmpType {
    /// Map a wire tag to its semantic type.
    ///
    /// Unrecognized tags map to [`SnmpType::Other`] and are logged.
    pub fn from_wire_tag(wire: u8) -> Self {
        match wire {
            tag::universal::INTEGER => SnmpType::Integer,
            tag::universal::OCTET_STRING => SnmpType::OctetStr,
            tag::application::OPAQUE => SnmpType::Opaque,
            tag::universal::OBJECT_IDENTIFIER => SnmpType::ObjectId,
            tag::application::TIMETICKS => SnmpType::TimeTicks,
            tag::application::GAUGE32 => SnmpType::Gauge,
            tag::application::COUNTER32 => SnmpType::Counter,
            tag::application::IP_ADDRESS => SnmpType::IpAddr,
            tag::universal::BIT_STRING => SnmpType::BitString,
            tag::universal::NULL => SnmpType::Null,
            tag::application::UINTEGER => SnmpType::UInteger,
            tag::application::COUNTER64 => SnmpType::Counter64,
            tag::context::END_OF_MIB_VIEW => SnmpType::EndOfMibView,
            tag::context::NO_SUCH_OBJECT => SnmpType::NoSuchObject,
            tag::context::NO_SUCH_INSTANCE => SnmpType::NoSuchInstance,
            other => {
                tracing::error!(
                    target: "async_snmp_session::types",
                    { tag = other },
                    "unrecognized wire type tag"
                );
                SnmpType::Other
            }
        }
    }

    /// Parse a caller-supplied type string.
    ///
    /// Accepts the single letters `i u s n o t a b` and the keywords of
    /// [`SnmpType::name`] case-insensitively. Most keywords match on a short
    /// prefix (`"int"` is INTEGER, `"INTEGER3"` is INTEGER32); only
    /// `"COUNTER"` must be spelled out, which leaves e.g. `"counter32"` to
    /// the COUNTER64 prefix. Returns `None` for anything else.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.len() == 1 {
            return match name.as_bytes()[0] {
                b'i' => Some(SnmpType::Integer),
                b'u' => Some(SnmpType::Unsigned32),
                b's' => Some(SnmpType::OctetStr),
                b'n' => Some(SnmpType::Null),
                b'o' => Some(SnmpType::ObjectId),
                b't' => Some(SnmpType::TimeTicks),
                b'a' => Some(SnmpType::IpAddr),
                b'b' => Some(SnmpType::BitString),
                _ => None,
            };
        }

        KEYWORDS
            .iter()
            .find(|(keyword, significant, _)| match significant {
                0 => name.eq_ignore_ascii_case(keyword),
                n => prefix_matches(name, keyword, *n),
            })
            .map(|(_, _, ty)| *ty)
    }

    /// Symbolic name carried by result records. Empty for [`SnmpType::Other`].
    pub fn name(self) -> &'static str {
        match self {
            SnmpType::ObjectId => "OBJECTID",
            SnmpType::OctetStr => "OCTETSTR",
            SnmpType::Integer => "INTEGER",
            SnmpType::Integer32 => "INTEGER32",
            SnmpType::Unsigned32 => "UNSIGNED32",
            SnmpType::NetAddr => "NETADDR",
            SnmpType::IpAddr => "IPADDR",
            SnmpType::Counter => "COUNTER",
            SnmpType::Gauge => "GAUGE",
            SnmpType::TimeTicks => "TICKS",
            SnmpType::Opaque => "OPAQUE",
            SnmpType::Counter64 => "COUNTER64",
            SnmpType::Null => "NULL",
            SnmpType::BitString => "BITS",
            SnmpType::UInteger => "UINTEGER",
            SnmpType::NotifType => "NOTIF",
            SnmpType::TrapType => "TRAP",
            SnmpType::EndOfMibView => "ENDOFMIBVIEW",
            SnmpType::NoSuchObject => "NOSUCHOBJECT",
            SnmpType::NoSuchInstance => "NOSUCHINSTANCE",
            SnmpType::Other => "",
        }
    }

    /// Whether the type names a value-bearing object.
    ///
    /// Leaf detection treats a MIB node as a leaf when its type (or its
    /// parent's) has a symbolic name.
    pub fn is_named(self) -> bool {
        !self.name().is_empty()
    }

    /// Whether values of this type convert to a number in results.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            SnmpType::Integer
                | SnmpType::Integer32
                | SnmpType::Unsigned32
                | SnmpType::Counter
                | SnmpType::Gauge
                | SnmpType::Counter64
                | SnmpType::UInteger
                | SnmpType::TimeTicks
        )
    }
}

/// Case-insensitive compare of the first `n` bytes, failing when `input`
/// is shorter than `n`.
fn prefix_matches(input: &str, keyword: &str, n: usize) -> bool {
    let n = n.min(keyword.len());
    input.len() >= n && input.as_bytes()[..n].eq_ignore_ascii_case(&keyword.as_bytes()[..n])
}

impl fmt::Display for SnmpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tags() {
        assert_eq!(SnmpType::from_wire_tag(0x02), SnmpType::Integer);
        assert_eq!(SnmpType::from_wire_tag(0x04), SnmpType::OctetStr);
        assert_eq!(SnmpType::from_wire_tag(0x42), SnmpType::Gauge);
        assert_eq!(SnmpType::from_wire_tag(0x46), SnmpType::Counter64);
        assert_eq!(SnmpType::from_wire_tag(0x80), SnmpType::NoSuchObject);
        assert_eq!(SnmpType::from_wire_tag(0x81), SnmpType::NoSuchInstance);
        assert_eq!(SnmpType::from_wire_tag(0x82), SnmpType::EndOfMibView);
    }

    #[test]
    fn test_unknown_wire_tag_is_other() {
        assert_eq!(SnmpType::from_wire_tag(0x45), SnmpType::Other);
        assert_eq!(SnmpType::from_wire_tag(0x78), SnmpType::Other);
        assert_eq!(SnmpType::Other.name(), "");
    }

    #[test]
    fn test_shorthand_letters() {
        let cases = [
            ("i", SnmpType::Integer),
            ("u", SnmpType::Unsigned32),
            ("s", SnmpType::OctetStr),
            ("n", SnmpType::Null),
            ("o", SnmpType::ObjectId),
            ("t", SnmpType::TimeTicks),
            ("a", SnmpType::IpAddr),
            ("b", SnmpType::BitString),
        ];
        for (letter, ty) in cases {
            assert_eq!(SnmpType::from_name(letter), Some(ty), "letter {letter}");
        }
        assert_eq!(SnmpType::from_name("x"), None);
        assert_eq!(SnmpType::from_name("I"), None);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(SnmpType::from_name("integer"), Some(SnmpType::Integer));
        assert_eq!(SnmpType::from_name("Integer32"), Some(SnmpType::Integer32));
        assert_eq!(SnmpType::from_name("OCTETSTR"), Some(SnmpType::OctetStr));
        assert_eq!(SnmpType::from_name("ticks"), Some(SnmpType::TimeTicks));
        assert_eq!(SnmpType::from_name("IpAddr"), Some(SnmpType::IpAddr));
        assert_eq!(SnmpType::from_name("uinteger"), Some(SnmpType::UInteger));
        assert_eq!(SnmpType::from_name("NoSuchObject"), Some(SnmpType::NoSuchObject));
        assert_eq!(
            SnmpType::from_name("nosuchinstance"),
            Some(SnmpType::NoSuchInstance)
        );
        assert_eq!(SnmpType::from_name("trap"), Some(SnmpType::TrapType));
    }

    #[test]
    fn test_keyword_prefix_rules() {
        // Three significant letters for most keywords
        assert_eq!(SnmpType::from_name("int"), Some(SnmpType::Integer));
        assert_eq!(SnmpType::from_name("in"), None);
        // COUNTER is exact; anything longer falls through to COUNTER64's prefix
        assert_eq!(SnmpType::from_name("counter"), Some(SnmpType::Counter));
        assert_eq!(SnmpType::from_name("counter32"), Some(SnmpType::Counter64));
        assert_eq!(SnmpType::from_name("cou"), Some(SnmpType::Counter64));
        // TRAP needs all four letters
        assert_eq!(SnmpType::from_name("tra"), None);
    }

    #[test]
    fn test_names_parse_back() {
        for ty in [
            SnmpType::ObjectId,
            SnmpType::OctetStr,
            SnmpType::Integer,
            SnmpType::Integer32,
            SnmpType::Unsigned32,
            SnmpType::IpAddr,
            SnmpType::Counter,
            SnmpType::Gauge,
            SnmpType::TimeTicks,
            SnmpType::Counter64,
            SnmpType::BitString,
            SnmpType::UInteger,
            SnmpType::EndOfMibView,
        ] {
            assert_eq!(SnmpType::from_name(ty.name()), Some(ty), "{ty:?}");
        }
    }
}
