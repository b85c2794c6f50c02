//! Request tags and response names.
//!
//! On the way in, a caller's tag such as `sysDescr.0` is split into the part
//! the MIB resolves and the instance suffix appended afterwards. On the way
//! out, the rendered name of a response variable is split into the `oid`
//! and `oid_index` fields of a [`Variable`](crate::Variable).

use crate::oid;
use std::borrow::Cow;
use std::fmt;

/// A requested object: a symbolic or numeric tag plus an instance suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OidSpec {
    tag: String,
    iid: String,
}

impl OidSpec {
    /// Normalize a tag, moving trailing numeric components into the
    /// instance id.
    ///
    /// Purely numeric tags are kept whole.
    ///
    /// ```
    /// use async_snmp_session::OidSpec;
    ///
    /// let spec = OidSpec::new("sysDescr.0");
    /// assert_eq!((spec.tag(), spec.iid()), ("sysDescr", "0"));
    ///
    /// let spec = OidSpec::new("SNMPv2-MIB::sysDescr.0");
    /// assert_eq!((spec.tag(), spec.iid()), ("SNMPv2-MIB::sysDescr", "0"));
    ///
    /// let spec = OidSpec::new(".1.3.6.1.2.1.1.1.0");
    /// assert_eq!((spec.tag(), spec.iid()), (".1.3.6.1.2.1.1.1.0", ""));
    /// ```
    pub fn new(tag: impl Into<String>) -> Self {
        let mut tag = tag.into();
        if oid::is_numeric_tag(&tag) {
            return Self {
                tag,
                iid: String::new(),
            };
        }

        let mut cut = tag.len();
        for (pos, _) in tag.rmatch_indices('.') {
            let component = &tag[pos + 1..cut];
            if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                break;
            }
            cut = pos;
        }

        let iid = if cut < tag.len() {
            let iid = tag[cut + 1..].to_string();
            tag.truncate(cut);
            iid
        } else {
            String::new()
        };
        Self { tag, iid }
    }

    /// Take tag and instance id as given.
    pub fn with_index(tag: impl Into<String>, iid: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            iid: iid.into(),
        }
    }

    /// The part resolved against the MIB.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Dotted instance suffix, possibly empty.
    pub fn iid(&self) -> &str {
        &self.iid
    }
}

impl From<&str> for OidSpec {
    fn from(tag: &str) -> Self {
        OidSpec::new(tag)
    }
}

impl From<String> for OidSpec {
    fn from(tag: String) -> Self {
        OidSpec::new(tag)
    }
}

impl From<(&str, &str)> for OidSpec {
    fn from((tag, iid): (&str, &str)) -> Self {
        OidSpec::with_index(tag, iid)
    }
}

impl fmt::Display for OidSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.iid.is_empty() {
            f.write_str(&self.tag)
        } else {
            write!(f, "{}.{}", self.tag, self.iid)
        }
    }
}

/// Options for [`split_label_iid`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameFlags {
    /// The name is dotted numeric.
    pub numeric: bool,
    /// Keep everything before the instance id as the label.
    pub long_names: bool,
    /// Fail unless the instance id starts with a digit.
    pub fail_on_null_iid: bool,
    /// The name is not a leaf object; it has no instance id.
    pub non_leaf: bool,
}

const ROOT_ARCS: &[(&str, char)] = &[(".ccitt", '0'), (".iso", '1'), (".joint-iso-ccitt", '2')];

/// Split a rendered response name into its label and instance id.
///
/// ```
/// use async_snmp_session::label::{split_label_iid, NameFlags};
///
/// let (label, iid) = split_label_iid("ifDescr.3", NameFlags::default()).unwrap();
/// assert_eq!((&*label, iid), ("ifDescr", "3"));
///
/// let flags = NameFlags { numeric: true, ..Default::default() };
/// let (label, iid) = split_label_iid(".1.3.6.1.2.1.1.1.0", flags).unwrap();
/// assert_eq!((&*label, iid), ("1", "0"));
/// ```
pub fn split_label_iid(name: &str, flags: NameFlags) -> Option<(Cow<'_, str>, &str)> {
    if name.is_empty() {
        return None;
    }

    if flags.numeric {
        return split_numeric(name, flags.long_names);
    }

    let bytes = name.as_bytes();
    let mut iid_dot = name.len();
    let mut found = false;
    let mut start = 0;
    for pos in (0..name.len()).rev() {
        match bytes[pos] {
            b'.' if found => {
                start = pos + 1;
                break;
            }
            b'.' => iid_dot = pos,
            b if b.is_ascii_alphabetic() => found = true,
            _ => {}
        }
    }

    let iid_starts_with_digit = bytes.get(iid_dot + 1).is_some_and(u8::is_ascii_digit);
    if !found || (flags.fail_on_null_iid && !iid_starts_with_digit) {
        return None;
    }

    if flags.non_leaf {
        if start == 1 {
            for &(word, digit) in ROOT_ARCS {
                if let Some(rest) = name.strip_prefix(word)
                    && rest.starts_with('.')
                {
                    return Some((Cow::Owned(format!(".{}{}", digit, rest)), ""));
                }
            }
        }
        return Some((Cow::Borrowed(name), ""));
    }

    let label_start = if flags.long_names { 0 } else { start };
    let iid = name.get(iid_dot + 1..).unwrap_or("");
    Some((Cow::Borrowed(&name[label_start..iid_dot]), iid))
}

fn split_numeric(name: &str, long_names: bool) -> Option<(Cow<'_, str>, &str)> {
    if !oid::is_numeric_tag(name) {
        return None;
    }
    let iid_dot = name.rfind('.').filter(|&pos| pos > 0)?;
    let start = match name[1..iid_dot].rfind('.') {
        Some(pos) => pos + 2,
        None if name.starts_with('.') => 1,
        None => 0,
    };
    let label_start = if long_names { 0 } else { start };
    Some((Cow::Borrowed(&name[label_start..iid_dot]), &name[iid_dot + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(name: &str, flags: NameFlags) -> Option<(String, String)> {
        split_label_iid(name, flags).map(|(l, i)| (l.into_owned(), i.to_string()))
    }

    fn pair(label: &str, iid: &str) -> Option<(String, String)> {
        Some((label.to_string(), iid.to_string()))
    }

    #[test]
    fn test_oid_spec_normalization() {
        let spec = OidSpec::new("ifDescr.1.2");
        assert_eq!((spec.tag(), spec.iid()), ("ifDescr", "1.2"));

        let spec = OidSpec::new("sysDescr");
        assert_eq!((spec.tag(), spec.iid()), ("sysDescr", ""));

        let spec = OidSpec::new("system.sysDescr.0");
        assert_eq!((spec.tag(), spec.iid()), ("system.sysDescr", "0"));

        let spec = OidSpec::new("iso.3.6.1.2.1.1.1.0");
        assert_eq!((spec.tag(), spec.iid()), ("iso", "3.6.1.2.1.1.1.0"));

        let spec = OidSpec::with_index("sysDescr", "0");
        assert_eq!(spec.to_string(), "sysDescr.0");
    }

    #[test]
    fn test_split_suffix_names() {
        let flags = NameFlags::default();
        assert_eq!(split("sysDescr.0", flags), pair("sysDescr", "0"));
        assert_eq!(split("ifDescr.1.2", flags), pair("ifDescr", "1.2"));
        assert_eq!(split("sysDescr", flags), pair("sysDescr", ""));
        assert_eq!(split("a.0", flags), pair("a", "0"));
        assert_eq!(split(".1.3.6", flags), None);
        assert_eq!(split("", flags), None);
    }

    #[test]
    fn test_split_full_names() {
        let name = ".iso.org.dod.internet.mgmt.mib-2.system.sysDescr.0";
        assert_eq!(split(name, NameFlags::default()), pair("sysDescr", "0"));
        let long = NameFlags {
            long_names: true,
            ..Default::default()
        };
        assert_eq!(
            split(name, long),
            pair(".iso.org.dod.internet.mgmt.mib-2.system.sysDescr", "0")
        );
    }

    #[test]
    fn test_split_numeric() {
        let numeric = NameFlags {
            numeric: true,
            ..Default::default()
        };
        assert_eq!(split(".1.3.6.1.2.1.1.1.0", numeric), pair("1", "0"));
        let long = NameFlags {
            long_names: true,
            ..numeric
        };
        assert_eq!(split(".1.3.6.1.2.1.1.1.0", long), pair(".1.3.6.1.2.1.1.1", "0"));
        assert_eq!(split(".1.5", numeric), pair("1", "5"));
        assert_eq!(split("sysDescr.0", numeric), None);
        assert_eq!(split(".1", numeric), None);
    }

    #[test]
    fn test_fail_on_null_iid() {
        let flags = NameFlags {
            fail_on_null_iid: true,
            ..Default::default()
        };
        assert_eq!(split("sysDescr", flags), None);
        assert_eq!(split("sysDescr.0", flags), pair("sysDescr", "0"));
    }

    #[test]
    fn test_non_leaf_names() {
        let flags = NameFlags {
            non_leaf: true,
            ..Default::default()
        };
        assert_eq!(split("system.1", flags), pair("system.1", ""));
        assert_eq!(split(".iso.3.6.1.99", flags), pair(".1.3.6.1.99", ""));
        assert_eq!(split(".ccitt.7", flags), pair(".0.7", ""));
        assert_eq!(split(".joint-iso-ccitt.5.1", flags), pair(".2.5.1", ""));
        assert_eq!(split(".iso.org.6", flags), pair(".iso.org.6", ""));
    }
}
