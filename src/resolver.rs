//! Tag to numeric OID resolution.

use crate::error::{Error, Result};
use crate::label::OidSpec;
use crate::mib::{MibNode, MibTree};
use crate::oid::{self, MAX_OID_LEN, Oid};
use crate::types::SnmpType;
use std::sync::Arc;

/// How symbolic tags are looked up in the MIB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// A bare descriptor is looked up directly; dotted or `MODULE::` tags
    /// are parsed as long names.
    #[default]
    Exact,
    /// Regex-capable search (`if.*Octets`).
    WildcardBestGuess,
    /// Best-effort single-result search.
    RandomBestGuess,
}

/// A tag resolved to its numeric OID.
#[derive(Debug, Clone)]
pub struct ResolvedOid {
    /// Full OID, instance id included.
    pub oid: Oid,
    /// MIB node governing the OID, if the MIB knows it.
    pub node: Option<Arc<MibNode>>,
}

impl ResolvedOid {
    /// Syntax of the governing node.
    pub fn ty(&self) -> Option<SnmpType> {
        self.node.as_ref().and_then(|node| node.ty)
    }
}

/// Resolve `spec` to a numeric OID.
///
/// Numeric tags are parsed directly and never consult the MIB's symbolic
/// lookups. The instance id, when present, is appended afterwards.
pub fn resolve<M: MibTree + ?Sized>(
    mib: &M,
    spec: &OidSpec,
    strategy: Strategy,
) -> Result<ResolvedOid> {
    let tag = spec.tag();
    let base = if oid::is_numeric_tag(tag) {
        oid::parse_numeric(tag).ok()
    } else {
        match strategy {
            Strategy::Exact if !tag.contains(['.', ':']) => {
                mib.find_node(tag).map(|node| node.oid.clone())
            }
            Strategy::Exact => mib.parse_long_name(tag),
            Strategy::WildcardBestGuess => {
                mib.clear_search_marks();
                mib.find_node_wild(tag)
            }
            Strategy::RandomBestGuess => mib.find_node_best(tag),
        }
    };

    let Some(mut resolved) = base else {
        tracing::debug!(
            target: "async_snmp_session::resolver",
            { snmp.tag = tag, ?strategy },
            "tag did not resolve"
        );
        return Err(Error::unknown_object_id(tag));
    };

    let node = mib.node_by_oid(&resolved);
    append_instance(&mut resolved, spec.iid());

    if resolved.is_empty() || resolved.len() > MAX_OID_LEN {
        return Err(Error::unknown_object_id(tag));
    }

    tracing::trace!(
        target: "async_snmp_session::resolver",
        { snmp.tag = tag, snmp.oid = %resolved },
        "resolved"
    );
    Ok(ResolvedOid {
        oid: resolved,
        node,
    })
}

/// Append the dotted instance id to `oid`.
///
/// Components that are not unsigned integers are skipped with a warning
/// rather than failing the resolution.
pub fn append_instance(oid: &mut Oid, iid: &str) {
    for component in iid.split('.').filter(|c| !c.is_empty()) {
        match component.parse::<u32>() {
            Ok(arc) => oid.push(arc),
            Err(_) => {
                tracing::warn!(
                    target: "async_snmp_session::resolver",
                    { snmp.iid = iid, component },
                    "skipping non-numeric instance component"
                );
            }
        }
    }
}
