//! MIB tree collaborator.
//!
//! The session never parses MIB files. It asks a [`MibTree`] to turn
//! symbolic names into OIDs, to find the node governing an OID (for its
//! type, enumerations and display hint) and to render names and values the
//! way the loaded MIB describes them.
//!
//! [`MibTable`] is an in-memory implementation loaded programmatically.

mod table;

pub use table::{MibTable, MibTableBuilder};

use crate::codec;
use crate::oid::Oid;
use crate::types::SnmpType;
use crate::value::Value;
use std::sync::Arc;

/// How OID names are rendered in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LabelFormat {
    /// Last matching label plus trailing arcs: `sysDescr.0`.
    #[default]
    Suffix,
    /// Every arc as a label where one exists: `.iso.org.dod.internet.mgmt.mib-2.system.sysDescr.0`.
    Full,
    /// Dotted numeric: `.1.3.6.1.2.1.1.1.0`.
    Numeric,
}

/// One enumeration label of an INTEGER or BITS object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub value: i32,
    pub label: String,
}

/// A node of the MIB tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MibNode {
    /// Numeric OID of the node.
    pub oid: Oid,
    /// Descriptor, e.g. `sysDescr`.
    pub label: String,
    /// Defining module, e.g. `SNMPv2-MIB`.
    pub module: Option<String>,
    /// Syntax of the object; `None` for non-leaf nodes.
    pub ty: Option<SnmpType>,
    /// Named numbers (INTEGER) or named bits (BITS).
    pub enums: Vec<EnumValue>,
    /// DISPLAY-HINT of the object's textual convention.
    pub hint: Option<String>,
}

impl MibNode {
    /// Create a node with no module, enumerations or hint.
    pub fn new(oid: Oid, label: impl Into<String>, ty: Option<SnmpType>) -> Self {
        Self {
            oid,
            label: label.into(),
            module: None,
            ty,
            enums: Vec::new(),
            hint: None,
        }
    }

    /// Set the defining module.
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Add an enumeration label.
    pub fn enum_value(mut self, value: i32, label: impl Into<String>) -> Self {
        self.enums.push(EnumValue {
            value,
            label: label.into(),
        });
        self
    }

    /// Set the DISPLAY-HINT.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Label for an enumerated value.
    pub fn enum_label(&self, value: i32) -> Option<&str> {
        self.enums
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.label.as_str())
    }

    /// Value for an enumeration label.
    pub fn enum_number(&self, label: &str) -> Option<i32> {
        self.enums.iter().find(|e| e.label == label).map(|e| e.value)
    }
}

/// Lookups the session needs from a loaded MIB.
///
/// Lookups return full OIDs; the session appends instance identifiers
/// itself. Purely numeric tags never reach this trait except through
/// [`node_by_oid`](MibTree::node_by_oid).
pub trait MibTree: Send + Sync {
    /// Look up a single descriptor such as `sysDescr`.
    fn find_node(&self, label: &str) -> Option<Arc<MibNode>>;

    /// Regex-capable lookup (`if.*Octets`, `sysDescr.0`).
    fn find_node_wild(&self, pattern: &str) -> Option<Oid>;

    /// Best-effort single-result lookup accepting `MODULE::name.suffix`.
    fn find_node_best(&self, name: &str) -> Option<Oid>;

    /// Node with the longest OID that prefixes `oid`.
    fn node_by_oid(&self, oid: &Oid) -> Option<Arc<MibNode>>;

    /// Resolve a dotted symbolic path or `MODULE::name` form.
    fn parse_long_name(&self, name: &str) -> Option<Oid>;

    /// Forget state left behind by a previous wildcard search.
    fn clear_search_marks(&self) {}

    /// Whether `node` names an object with a value.
    ///
    /// True when the node or its parent has a named type.
    fn is_leaf(&self, node: &MibNode) -> bool {
        if node.ty.is_some_and(SnmpType::is_named) {
            return true;
        }
        node.oid
            .parent()
            .and_then(|parent| self.node_by_oid(&parent))
            .and_then(|parent| parent.ty)
            .is_some_and(SnmpType::is_named)
    }

    /// Render `oid` in the requested format.
    fn format_name(&self, oid: &Oid, format: LabelFormat) -> String {
        match format {
            LabelFormat::Numeric => oid.to_dotted(),
            LabelFormat::Suffix => match self.node_by_oid(oid) {
                Some(node) => {
                    let mut name = node.label.clone();
                    for arc in &oid.arcs()[node.oid.len()..] {
                        name.push('.');
                        name.push_str(&arc.to_string());
                    }
                    name
                }
                None => oid.to_dotted(),
            },
            LabelFormat::Full => {
                let mut name = String::new();
                for len in 1..=oid.len() {
                    name.push('.');
                    match self.node_by_oid(&oid.prefix(len)) {
                        Some(node) if node.oid.len() == len => name.push_str(&node.label),
                        _ => name.push_str(&oid.arcs()[len - 1].to_string()),
                    }
                }
                name
            }
        }
    }

    /// Render a value the way the MIB describes it.
    ///
    /// The default honors enumerations, display hints and timeticks.
    fn format_value(&self, _oid: &Oid, value: &Value, node: Option<&MibNode>) -> String {
        codec::agent::format(value, node)
    }
}

impl<T: MibTree + ?Sized> MibTree for Arc<T> {
    fn find_node(&self, label: &str) -> Option<Arc<MibNode>> {
        (**self).find_node(label)
    }

    fn find_node_wild(&self, pattern: &str) -> Option<Oid> {
        (**self).find_node_wild(pattern)
    }

    fn find_node_best(&self, name: &str) -> Option<Oid> {
        (**self).find_node_best(name)
    }

    fn node_by_oid(&self, oid: &Oid) -> Option<Arc<MibNode>> {
        (**self).node_by_oid(oid)
    }

    fn parse_long_name(&self, name: &str) -> Option<Oid> {
        (**self).parse_long_name(name)
    }

    fn clear_search_marks(&self) {
        (**self).clear_search_marks()
    }

    fn is_leaf(&self, node: &MibNode) -> bool {
        (**self).is_leaf(node)
    }

    fn format_name(&self, oid: &Oid, format: LabelFormat) -> String {
        (**self).format_name(oid, format)
    }

    fn format_value(&self, oid: &Oid, value: &Value, node: Option<&MibNode>) -> String {
        (**self).format_value(oid, value, node)
    }
}
