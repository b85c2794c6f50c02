//! SNMP version enumeration.

/// SNMP protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Version {
    /// SNMPv1 (RFC 1157)
    V1,
    /// SNMPv2c (RFC 1901)
    #[default]
    V2c,
    /// SNMPv3 (RFC 3411-3418)
    V3,
}

impl Version {
    /// Version number as carried in the message header.
    pub const fn as_i32(self) -> i32 {
        match self {
            Version::V1 => 0,
            Version::V2c => 1,
            Version::V3 => 3,
        }
    }

    /// Parse the numbers callers commonly pass (`1`, `2`, `3`).
    pub const fn from_number(value: u8) -> Option<Self> {
        match value {
            1 => Some(Version::V1),
            2 => Some(Version::V2c),
            3 => Some(Version::V3),
            _ => None,
        }
    }

    /// Whether GETBULK is available.
    pub const fn supports_bulk(self) -> bool {
        !matches!(self, Version::V1)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V1 => write!(f, "SNMPv1"),
            Version::V2c => write!(f, "SNMPv2c"),
            Version::V3 => write!(f, "SNMPv3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers() {
        assert_eq!(Version::from_number(1), Some(Version::V1));
        assert_eq!(Version::from_number(2).map(Version::as_i32), Some(1));
        assert_eq!(Version::from_number(4), None);
        assert!(!Version::V1.supports_bulk());
        assert!(Version::V3.supports_bulk());
    }
}
