//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for common OIDs.

use crate::error::{Error, OidErrorKind, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a value".
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// Stored as a sequence of arc values (u32). Uses SmallVec to avoid
/// heap allocation for OIDs with 16 or fewer arcs.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    ///
    /// ```
    /// use async_snmp_session::oid::Oid;
    ///
    /// let oid = Oid::new([1, 3, 6, 1]);
    /// assert_eq!(oid.len(), 4);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted string notation (e.g., "1.3.6.1.2.1.1.1.0").
    ///
    /// Empty components are skipped, so a leading dot is accepted. This is
    /// the lenient parser behind `FromStr`; tag resolution uses
    /// [`parse_numeric`], which is strict.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();

        for part in s.split('.') {
            if part.is_empty() {
                continue;
            }

            let arc: u32 = part.parse().map_err(|_| {
                Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s.to_string())
            })?;

            arcs.push(arc);
        }

        Ok(Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Check if this OID starts with another OID.
    ///
    /// ```
    /// use async_snmp_session::oid::Oid;
    ///
    /// let sys_descr = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
    /// let system = Oid::parse("1.3.6.1.2.1.1").unwrap();
    /// let interfaces = Oid::parse("1.3.6.1.2.1.2").unwrap();
    ///
    /// assert!(sys_descr.starts_with(&system));
    /// assert!(!sys_descr.starts_with(&interfaces));
    /// assert!(sys_descr.starts_with(&sys_descr));
    /// ```
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.arcs.len() >= other.arcs.len() && self.arcs[..other.arcs.len()] == other.arcs[..]
    }

    /// Get the parent OID (all arcs except the last).
    ///
    /// Returns `None` if the OID is empty.
    pub fn parent(&self) -> Option<Oid> {
        if self.arcs.is_empty() {
            None
        } else {
            Some(Oid {
                arcs: SmallVec::from_slice(&self.arcs[..self.arcs.len() - 1]),
            })
        }
    }

    /// Create a child OID by appending an arc.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// Append an arc in place.
    pub fn push(&mut self, arc: u32) {
        self.arcs.push(arc);
    }

    /// OID truncated to its first `len` arcs.
    pub fn prefix(&self, len: usize) -> Oid {
        Oid::from_slice(&self.arcs[..len.min(self.arcs.len())])
    }

    /// Validate that the OID doesn't exceed the maximum arc count.
    pub fn validate_length(&self) -> Result<()> {
        if self.arcs.len() > MAX_OID_LEN {
            return Err(Error::invalid_oid(OidErrorKind::TooManyArcs {
                count: self.arcs.len(),
                max: MAX_OID_LEN,
            }));
        }
        Ok(())
    }

    /// Render with a dot before every arc (".1.3.6.1").
    ///
    /// This is the form object-identifier values take in results.
    pub fn to_dotted(&self) -> String {
        use std::fmt::Write;
        let mut out = String::with_capacity(self.arcs.len() * 4);
        for arc in &self.arcs {
            let _ = write!(out, ".{}", arc);
        }
        out
    }
}

/// Whether a tag is a numeric OID candidate: it contains no alphabetic character.
pub fn is_numeric_tag(tag: &str) -> bool {
    !tag.bytes().any(|b| b.is_ascii_alphabetic())
}

/// Strictly parse a purely numeric dotted OID.
///
/// One leading dot is allowed. Alphabetic characters, empty or
/// non-numeric components and OIDs longer than [`MAX_OID_LEN`] all fail.
///
/// ```
/// use async_snmp_session::oid::{parse_numeric, Oid};
///
/// assert_eq!(parse_numeric(".1.3.6.1").unwrap(), Oid::new([1, 3, 6, 1]));
/// assert!(parse_numeric("1.3.six").is_err());
/// assert!(parse_numeric("1..3").is_err());
/// ```
pub fn parse_numeric(s: &str) -> Result<Oid> {
    if !is_numeric_tag(s) {
        return Err(Error::invalid_oid_with_input(OidErrorKind::NotNumeric, s));
    }
    let body = s.strip_prefix('.').unwrap_or(s);
    if body.is_empty() {
        return Err(Error::invalid_oid_with_input(OidErrorKind::Empty, s));
    }

    let mut oid = Oid::empty();
    for part in body.split('.') {
        let arc: u32 = part
            .parse()
            .map_err(|_| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s))?;
        oid.push(arc);
    }
    oid.validate_length()?;
    Ok(oid)
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Macro to create an OID at compile time.
///
/// ```
/// use async_snmp_session::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1, 1, 1, 0]);
    }

    #[test]
    fn test_display_and_dotted() {
        let oid = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
        assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.1.0");
        assert_eq!(oid.to_dotted(), ".1.3.6.1.2.1.1.1.0");
        assert_eq!(Oid::empty().to_dotted(), "");
    }

    #[test]
    fn test_ordering() {
        assert!(oid!(1, 3, 6, 1, 2) < oid!(1, 3, 6, 1, 2, 0));
        assert!(oid!(1, 3, 6, 1, 2, 1, 1, 9) < oid!(1, 3, 6, 1, 2, 1, 2));
    }

    #[test]
    fn test_is_numeric_tag() {
        assert!(is_numeric_tag("1.3.6.1"));
        assert!(is_numeric_tag(".1.3.6.1"));
        assert!(!is_numeric_tag("sysDescr"));
        assert!(!is_numeric_tag("1.3.6.1.x"));
    }

    #[test]
    fn test_parse_numeric_rejects_malformed() {
        assert!(matches!(
            parse_numeric("1.3.a"),
            Err(Error::InvalidOid {
                kind: OidErrorKind::NotNumeric,
                ..
            })
        ));
        assert!(matches!(
            parse_numeric("."),
            Err(Error::InvalidOid {
                kind: OidErrorKind::Empty,
                ..
            })
        ));
        assert!(parse_numeric("1.3.").is_err());
        assert!(parse_numeric("1.-3").is_err());
        assert!(parse_numeric("1.99999999999").is_err());
    }

    #[test]
    fn test_parse_numeric_enforces_max_len() {
        let long = vec!["1"; MAX_OID_LEN + 1].join(".");
        assert!(matches!(
            parse_numeric(&long),
            Err(Error::InvalidOid {
                kind: OidErrorKind::TooManyArcs { .. },
                ..
            })
        ));
        let max = vec!["1"; MAX_OID_LEN].join(".");
        assert_eq!(parse_numeric(&max).unwrap().len(), MAX_OID_LEN);
    }

    #[test]
    fn test_prefix_and_parent() {
        let oid = oid!(1, 3, 6, 1, 2);
        assert_eq!(oid.prefix(3), oid!(1, 3, 6));
        assert_eq!(oid.prefix(10), oid);
        assert_eq!(oid.parent(), Some(oid!(1, 3, 6, 1)));
        assert_eq!(Oid::empty().parent(), None);
    }
}
