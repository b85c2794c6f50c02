//! Result records.

use crate::types::SnmpType;
use std::fmt;

/// One variable returned by an operation.
///
/// `oid` and `oid_index` come from splitting the rendered response name;
/// `root_oid` is the tag the caller asked for, so results of a batch can be
/// matched back to their request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Variable {
    /// Tag of the request this variable answers.
    pub root_oid: String,
    /// Label part of the response name, e.g. `sysDescr`.
    pub oid: String,
    /// Instance part of the response name, e.g. `0`.
    pub oid_index: String,
    /// Type reported for the value.
    pub snmp_type: SnmpType,
    /// Rendered value; `None` for exception records produced by walks.
    pub value: Option<String>,
}

/// A value converted according to its type, see [`Variable::real_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealValue<'a> {
    Signed(i64),
    Unsigned(u64),
    Text(&'a str),
    Absent,
}

impl Variable {
    /// Value converted to a number for integer-like types.
    ///
    /// Values of other types, and values that were rendered in a
    /// non-numeric form (an enum label, agent formatting), stay text.
    ///
    /// ```
    /// use async_snmp_session::{RealValue, Variable};
    /// use async_snmp_session::types::SnmpType;
    ///
    /// let var = Variable {
    ///     root_oid: "ifInOctets".into(),
    ///     oid: "ifInOctets".into(),
    ///     oid_index: "1".into(),
    ///     snmp_type: SnmpType::Counter,
    ///     value: Some("12345".into()),
    /// };
    /// assert_eq!(var.real_value(), RealValue::Unsigned(12345));
    /// ```
    pub fn real_value(&self) -> RealValue<'_> {
        let Some(value) = self.value.as_deref() else {
            return RealValue::Absent;
        };
        if !self.snmp_type.is_numeric() {
            return RealValue::Text(value);
        }
        if let Ok(v) = value.parse::<u64>() {
            return RealValue::Unsigned(v);
        }
        match value.parse::<i64>() {
            Ok(v) => RealValue::Signed(v),
            Err(_) => RealValue::Text(value),
        }
    }

    /// The full requested name, `oid.oid_index`.
    pub fn name(&self) -> String {
        if self.oid_index.is_empty() {
            self.oid.clone()
        } else {
            format!("{}.{}", self.oid, self.oid_index)
        }
    }
}

fn printable(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value.as_deref().map(printable);
        write!(
            f,
            "<Variable value={:?} (oid={:?}, oid_index={:?}, snmp_type={:?}, root_oid={:?})>",
            value,
            self.oid,
            self.oid_index,
            self.snmp_type.name(),
            self.root_oid
        )
    }
}
