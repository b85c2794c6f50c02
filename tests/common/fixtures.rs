//! Common test fixtures and constants.

use async_snmp_session::mib::{LabelFormat, MibNode, MibTable, MibTree};
use async_snmp_session::{Oid, Value, oid};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// Standard system MIB OIDs (1.3.6.1.2.1.1.*)
// =============================================================================

pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}
pub fn sys_object_id() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 2, 0)
}
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}
pub fn sys_contact() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 4, 0)
}
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}
pub fn sys_location() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 6, 0)
}
pub fn sys_services() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 7, 0)
}

/// System subtree root: 1.3.6.1.2.1.1
pub fn system_subtree() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1)
}

/// ifDescr column: 1.3.6.1.2.1.2.2.1.2
pub fn if_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)
}

// =============================================================================
// Agent contents
// =============================================================================

/// The system group plus a two-row ifTable and ifNumber.
pub fn agent_data() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();
    data.insert(sys_descr(), Value::from("Linux r1 6.1.0 x86_64"));
    data.insert(
        sys_object_id(),
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 8072, 3, 2, 10)),
    );
    data.insert(sys_uptime(), Value::TimeTicks(8_640_123));
    data.insert(sys_contact(), Value::from("noc@example.net"));
    data.insert(sys_name(), Value::from("r1"));
    data.insert(sys_location(), Value::from("rack 4"));
    data.insert(sys_services(), Value::Integer(72));
    data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(2));
    for (index, name, admin, octets) in [(1, "lo", 1, 1_000), (2, "eth0", 2, 52_000)] {
        data.insert(if_descr().child(index), Value::from(name));
        data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, index), Value::Integer(admin));
        data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 8, index), Value::Integer(admin));
        data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, index), Value::Counter32(octets));
    }
    data
}

// =============================================================================
// MIB wrappers
// =============================================================================

/// Well-known MIB that counts symbolic lookups.
pub struct CountingMib {
    inner: MibTable,
    symbolic: AtomicUsize,
}

impl CountingMib {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MibTable::well_known(),
            symbolic: AtomicUsize::new(0),
        })
    }

    pub fn symbolic_lookups(&self) -> usize {
        self.symbolic.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.symbolic.fetch_add(1, Ordering::SeqCst);
    }
}

impl MibTree for CountingMib {
    fn find_node(&self, label: &str) -> Option<Arc<MibNode>> {
        self.count();
        self.inner.find_node(label)
    }

    fn find_node_wild(&self, pattern: &str) -> Option<Oid> {
        self.count();
        self.inner.find_node_wild(pattern)
    }

    fn find_node_best(&self, name: &str) -> Option<Oid> {
        self.count();
        self.inner.find_node_best(name)
    }

    fn node_by_oid(&self, oid: &Oid) -> Option<Arc<MibNode>> {
        self.inner.node_by_oid(oid)
    }

    fn parse_long_name(&self, name: &str) -> Option<Oid> {
        self.count();
        self.inner.parse_long_name(name)
    }

    fn format_name(&self, oid: &Oid, format: LabelFormat) -> String {
        self.inner.format_name(oid, format)
    }
}
