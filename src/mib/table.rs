//! In-memory MIB tree with sorted OID storage.

use super::{MibNode, MibTree};
use crate::oid::Oid;
use crate::types::SnmpType;
use regex::Regex;
use std::sync::Arc;

/// Root of relative symbolic paths such as `system.sysDescr.0`.
const MIB_2: &[u32] = &[1, 3, 6, 1, 2, 1];

/// A MIB tree held in memory.
///
/// Nodes are kept sorted by OID. Loading from MIB files is left to the
/// caller; [`MibTable::well_known`] provides the standard skeleton plus the
/// SNMPv2-MIB system group and the IF-MIB interfaces table.
///
/// ```
/// use async_snmp_session::mib::{MibNode, MibTable, MibTree};
/// use async_snmp_session::types::SnmpType;
/// use async_snmp_session::oid;
///
/// let mut table = MibTable::well_known();
/// table.insert(MibNode::new(oid!(1, 3, 6, 1, 4, 1, 99999, 1), "acmeTemp", Some(SnmpType::Gauge)));
///
/// assert_eq!(table.find_node("acmeTemp").unwrap().oid, oid!(1, 3, 6, 1, 4, 1, 99999, 1));
/// assert_eq!(table.parse_long_name("system.sysDescr.0"), Some(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MibTable {
    nodes: Vec<Arc<MibNode>>,
}

impl MibTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Start building a table.
    pub fn builder() -> MibTableBuilder {
        MibTableBuilder::default()
    }

    /// Insert a node, replacing any node with the same OID.
    pub fn insert(&mut self, node: MibNode) {
        let node = Arc::new(node);
        match self.nodes.binary_search_by(|n| n.oid.cmp(&node.oid)) {
            Ok(idx) => self.nodes[idx] = node,
            Err(idx) => self.nodes.insert(idx, node),
        }
    }

    /// Node with exactly this OID.
    pub fn get(&self, oid: &Oid) -> Option<&Arc<MibNode>> {
        self.nodes
            .binary_search_by(|n| n.oid.cmp(oid))
            .ok()
            .map(|idx| &self.nodes[idx])
    }

    /// Get the number of nodes in the table.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in OID order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<MibNode>> {
        self.nodes.iter()
    }

    /// First node in OID order carrying `label`, preferring `module` when given.
    fn by_label(&self, label: &str, module: Option<&str>) -> Option<&Arc<MibNode>> {
        let mut matches = self.nodes.iter().filter(|n| n.label == label);
        match module {
            Some(module) => {
                let first = matches.clone().next();
                matches
                    .find(|n| n.module.as_deref() == Some(module))
                    .or(first)
            }
            None => matches.next(),
        }
    }

    fn child(&self, parent: &Oid, label: &str) -> Option<&Arc<MibNode>> {
        self.nodes
            .iter()
            .find(|n| n.label == label && n.oid.len() == parent.len() + 1 && n.oid.starts_with(parent))
    }

    /// Follow `components` down from `start`: numeric components append
    /// arcs, symbolic ones must name a child of the current position.
    fn walk_path(&self, start: Oid, components: &[&str]) -> Option<Oid> {
        let mut current = start;
        for component in components {
            if component.is_empty() {
                return None;
            }
            if component.bytes().all(|b| b.is_ascii_digit()) {
                current.push(component.parse().ok()?);
            } else {
                current = self.child(&current, component)?.oid.clone();
            }
        }
        Some(current)
    }
}

/// Split `name` into the part before its trailing numeric components and
/// those components as arcs.
fn split_suffix(name: &str) -> Option<(&str, Oid)> {
    let mut label_end = name.len();
    let mut suffix = Vec::new();
    for (pos, component) in name.rmatch_indices('.').map(|(pos, _)| (pos, &name[pos + 1..])) {
        let component = component.split('.').next().unwrap_or_default();
        if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
            break;
        }
        suffix.push(component.parse::<u32>().ok()?);
        label_end = pos;
    }
    suffix.reverse();
    Some((&name[..label_end], Oid::new(suffix)))
}

fn append(mut base: Oid, suffix: &Oid) -> Oid {
    for &arc in suffix.arcs() {
        base.push(arc);
    }
    base
}

impl MibTree for MibTable {
    fn find_node(&self, label: &str) -> Option<Arc<MibNode>> {
        self.by_label(label, None).cloned()
    }

    fn find_node_wild(&self, pattern: &str) -> Option<Oid> {
        let (label, suffix) = split_suffix(pattern)?;
        let node = match Regex::new(&format!("^(?:{})$", label)) {
            Ok(re) => self.nodes.iter().find(|n| re.is_match(&n.label)),
            Err(err) => {
                tracing::debug!(
                    target: "async_snmp_session::mib",
                    { pattern, %err },
                    "not a regex, matching literally"
                );
                self.by_label(label, None)
            }
        }?;
        Some(append(node.oid.clone(), &suffix))
    }

    fn find_node_best(&self, name: &str) -> Option<Oid> {
        let (module, rest) = match name.split_once("::") {
            Some((module, rest)) => (Some(module), rest),
            None => (None, name),
        };
        let (label, suffix) = split_suffix(rest)?;
        let label = label.rsplit('.').next().unwrap_or(label);
        let node = self.by_label(label, module)?;
        Some(append(node.oid.clone(), &suffix))
    }

    fn node_by_oid(&self, oid: &Oid) -> Option<Arc<MibNode>> {
        (1..=oid.len())
            .rev()
            .find_map(|len| self.get(&oid.prefix(len)))
            .cloned()
    }

    fn parse_long_name(&self, name: &str) -> Option<Oid> {
        if let Some((module, rest)) = name.split_once("::") {
            let mut components = rest.split('.');
            let first = components.next()?;
            let node = self.by_label(first, Some(module))?;
            let rest: Vec<&str> = components.collect();
            return self.walk_path(node.oid.clone(), &rest);
        }

        let absolute = name.starts_with('.');
        let components: Vec<&str> = name.trim_start_matches('.').split('.').collect();
        self.walk_path(Oid::empty(), &components).or_else(|| {
            if absolute {
                None
            } else {
                self.walk_path(Oid::from_slice(MIB_2), &components)
            }
        })
    }
}

/// Builder for [`MibTable`].
#[derive(Debug, Default)]
pub struct MibTableBuilder {
    nodes: Vec<MibNode>,
}

impl MibTableBuilder {
    /// Add a node. Later nodes replace earlier ones with the same OID.
    pub fn node(mut self, node: MibNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a leaf object.
    pub fn object(self, arcs: &[u32], label: &str, ty: SnmpType) -> Self {
        self.node(MibNode::new(Oid::from_slice(arcs), label, Some(ty)))
    }

    /// Build the table.
    pub fn build(self) -> MibTable {
        let mut table = MibTable::new();
        for node in self.nodes {
            table.insert(node);
        }
        table
    }
}

impl MibTable {
    /// Standard registration skeleton, the SNMPv2-MIB system group and the
    /// IF-MIB interfaces table.
    pub fn well_known() -> Self {
        let mut table = MibTable::new();
        for &(arcs, label, module, ty) in WELL_KNOWN {
            let mut node = MibNode::new(Oid::from_slice(arcs), label, ty);
            if let Some(module) = module {
                node = node.module(module);
            }
            table.insert(node);
        }
        for &(arcs, value, label) in WELL_KNOWN_ENUMS {
            if let Some(node) = table.get(&Oid::from_slice(arcs)) {
                let node = (**node).clone().enum_value(value, label);
                table.insert(node);
            }
        }
        if let Some(node) = table.get(&Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 6])) {
            let node = (**node).clone().hint("1x:");
            table.insert(node);
        }
        table
    }
}

const SNMPV2: Option<&str> = Some("SNMPv2-MIB");
const IF: Option<&str> = Some("IF-MIB");

#[rustfmt::skip]
static WELL_KNOWN: &[(&[u32], &str, Option<&str>, Option<SnmpType>)] = &[
    (&[0], "ccitt", None, None),
    (&[1], "iso", None, None),
    (&[2], "joint-iso-ccitt", None, None),
    (&[1, 3], "org", None, None),
    (&[1, 3, 6], "dod", None, None),
    (&[1, 3, 6, 1], "internet", None, None),
    (&[1, 3, 6, 1, 2], "mgmt", None, None),
    (&[1, 3, 6, 1, 2, 1], "mib-2", None, None),
    (&[1, 3, 6, 1, 4], "private", None, None),
    (&[1, 3, 6, 1, 4, 1], "enterprises", None, None),
    (&[1, 3, 6, 1, 6], "snmpV2", None, None),
    // SNMPv2-MIB::system
    (&[1, 3, 6, 1, 2, 1, 1], "system", SNMPV2, None),
    (&[1, 3, 6, 1, 2, 1, 1, 1], "sysDescr", SNMPV2, Some(SnmpType::OctetStr)),
    (&[1, 3, 6, 1, 2, 1, 1, 2], "sysObjectID", SNMPV2, Some(SnmpType::ObjectId)),
    (&[1, 3, 6, 1, 2, 1, 1, 3], "sysUpTime", SNMPV2, Some(SnmpType::TimeTicks)),
    (&[1, 3, 6, 1, 2, 1, 1, 4], "sysContact", SNMPV2, Some(SnmpType::OctetStr)),
    (&[1, 3, 6, 1, 2, 1, 1, 5], "sysName", SNMPV2, Some(SnmpType::OctetStr)),
    (&[1, 3, 6, 1, 2, 1, 1, 6], "sysLocation", SNMPV2, Some(SnmpType::OctetStr)),
    (&[1, 3, 6, 1, 2, 1, 1, 7], "sysServices", SNMPV2, Some(SnmpType::Integer)),
    // IF-MIB::interfaces
    (&[1, 3, 6, 1, 2, 1, 2], "interfaces", IF, None),
    (&[1, 3, 6, 1, 2, 1, 2, 1], "ifNumber", IF, Some(SnmpType::Integer)),
    (&[1, 3, 6, 1, 2, 1, 2, 2], "ifTable", IF, None),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1], "ifEntry", IF, None),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 1], "ifIndex", IF, Some(SnmpType::Integer)),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 2], "ifDescr", IF, Some(SnmpType::OctetStr)),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 3], "ifType", IF, Some(SnmpType::Integer)),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 4], "ifMtu", IF, Some(SnmpType::Integer)),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 5], "ifSpeed", IF, Some(SnmpType::Gauge)),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 6], "ifPhysAddress", IF, Some(SnmpType::OctetStr)),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 7], "ifAdminStatus", IF, Some(SnmpType::Integer)),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 8], "ifOperStatus", IF, Some(SnmpType::Integer)),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 9], "ifLastChange", IF, Some(SnmpType::TimeTicks)),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 10], "ifInOctets", IF, Some(SnmpType::Counter)),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 16], "ifOutOctets", IF, Some(SnmpType::Counter)),
];

#[rustfmt::skip]
static WELL_KNOWN_ENUMS: &[(&[u32], i32, &str)] = &[
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 3], 1, "other"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 3], 6, "ethernetCsmacd"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 3], 24, "softwareLoopback"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 7], 1, "up"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 7], 2, "down"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 7], 3, "testing"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 8], 1, "up"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 8], 2, "down"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 8], 3, "testing"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 8], 5, "dormant"),
];
