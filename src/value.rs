//! SNMP value type.
//!
//! Values arrive from the engine already decoded; each variant corresponds
//! to one wire tag (see [`Value::tag`]).

use crate::oid::Oid;
use crate::tag;
use bytes::Bytes;

/// SNMP value.
///
/// Represents all SNMP data types including SMIv2 types, the opaque-wrapped
/// special types and exception values.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (ASN.1 primitive, signed 32-bit)
    Integer(i32),

    /// OCTET STRING (arbitrary bytes).
    OctetString(Bytes),

    /// BIT STRING (named-bit list, first octet is bit 0..7).
    BitString(Bytes),

    /// NULL
    Null,

    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),

    /// IpAddress (4 bytes, big-endian)
    IpAddress([u8; 4]),

    /// Counter32 (unsigned 32-bit, wrapping)
    Counter32(u32),

    /// Gauge32 / Unsigned32 (unsigned 32-bit, non-wrapping)
    Gauge32(u32),

    /// TimeTicks (hundredths of seconds since epoch)
    TimeTicks(u32),

    /// Opaque (legacy, arbitrary bytes)
    Opaque(Bytes),

    /// Counter64 (unsigned 64-bit, wrapping). SNMPv2c/v3 only.
    Counter64(u64),

    /// Historic UInteger32.
    UInteger32(u32),

    /// Counter64 wrapped in Opaque.
    OpaqueCounter64(u64),

    /// Float wrapped in Opaque.
    OpaqueFloat(f32),

    /// Double wrapped in Opaque.
    OpaqueDouble(f64),

    /// Signed 64-bit integer wrapped in Opaque.
    OpaqueI64(i64),

    /// Unsigned 64-bit integer wrapped in Opaque.
    OpaqueU64(u64),

    /// noSuchObject exception - the agent does not implement the object.
    NoSuchObject,

    /// noSuchInstance exception - the object exists but this instance does not.
    NoSuchInstance,

    /// endOfMibView exception - traversal ran past the end of the view.
    EndOfMibView,

    /// A tag the engine could not map to a known type.
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// Wire tag of this value.
    pub fn tag(&self) -> u8 {
        match self {
            Value::Integer(_) => tag::universal::INTEGER,
            Value::OctetString(_) => tag::universal::OCTET_STRING,
            Value::BitString(_) => tag::universal::BIT_STRING,
            Value::Null => tag::universal::NULL,
            Value::ObjectIdentifier(_) => tag::universal::OBJECT_IDENTIFIER,
            Value::IpAddress(_) => tag::application::IP_ADDRESS,
            Value::Counter32(_) => tag::application::COUNTER32,
            Value::Gauge32(_) => tag::application::GAUGE32,
            Value::TimeTicks(_) => tag::application::TIMETICKS,
            Value::Opaque(_) => tag::application::OPAQUE,
            Value::Counter64(_) => tag::application::COUNTER64,
            Value::UInteger32(_) => tag::application::UINTEGER,
            Value::OpaqueCounter64(_) => tag::opaque::COUNTER64,
            Value::OpaqueFloat(_) => tag::opaque::FLOAT,
            Value::OpaqueDouble(_) => tag::opaque::DOUBLE,
            Value::OpaqueI64(_) => tag::opaque::I64,
            Value::OpaqueU64(_) => tag::opaque::U64,
            Value::NoSuchObject => tag::context::NO_SUCH_OBJECT,
            Value::NoSuchInstance => tag::context::NO_SUCH_INSTANCE,
            Value::EndOfMibView => tag::context::END_OF_MIB_VIEW,
            Value::Unknown { tag, .. } => *tag,
        }
    }

    /// Check if this is an exception value.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32 (Counter32, Gauge32, TimeTicks, UInteger32).
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) | Value::UInteger32(v) => {
                Some(*v)
            }
            _ => None,
        }
    }

    /// Try to get raw bytes (OctetString, BitString, Opaque).
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(v) | Value::BitString(v) | Value::Opaque(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) => match std::str::from_utf8(data) {
                Ok(s) => write!(f, "{}", s),
                Err(_) => write!(f, "0x{}", crate::codec::hex::encode(data)),
            },
            Value::BitString(data) => write!(f, "BITS(0x{})", crate::codec::hex::encode(data)),
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(a) => write!(f, "{}.{}.{}.{}", a[0], a[1], a[2], a[3]),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) | Value::UInteger32(v) => {
                write!(f, "{}", v)
            }
            Value::Opaque(data) => write!(f, "Opaque(0x{})", crate::codec::hex::encode(data)),
            Value::Counter64(v) | Value::OpaqueCounter64(v) | Value::OpaqueU64(v) => {
                write!(f, "{}", v)
            }
            Value::OpaqueFloat(v) => write!(f, "{}", v),
            Value::OpaqueDouble(v) => write!(f, "{}", v),
            Value::OpaqueI64(v) => write!(f, "{}", v),
            Value::NoSuchObject => write!(f, "noSuchObject"),
            Value::NoSuchInstance => write!(f, "noSuchInstance"),
            Value::EndOfMibView => write!(f, "endOfMibView"),
            Value::Unknown { tag, data } => write!(
                f,
                "Unknown(tag=0x{:02X}, data=0x{})",
                tag,
                crate::codec::hex::encode(data)
            ),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}

impl From<std::net::Ipv4Addr> for Value {
    fn from(addr: std::net::Ipv4Addr) -> Self {
        Value::IpAddress(addr.octets())
    }
}
