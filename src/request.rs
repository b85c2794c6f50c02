//! Request assembly: resolving tags and marshalling SET values.
//!
//! Everything here runs before the first exchange, so a bad tag or value
//! aborts an operation without touching the network.

use crate::codec;
use crate::error::{Error, Result, ValueFailure};
use crate::label::OidSpec;
use crate::mib::{MibNode, MibTree};
use crate::oid::Oid;
use crate::resolver::{self, Strategy};
use crate::types::SnmpType;
use crate::varbind::VarBind;
use std::sync::Arc;

/// A caller tag resolved for a request.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedRoot {
    /// The tag as given, without its instance id.
    pub tag: String,
    pub oid: Oid,
    pub node: Option<Arc<MibNode>>,
}

pub(crate) fn resolve_one<M: MibTree + ?Sized>(
    mib: &M,
    spec: &OidSpec,
    strategy: Strategy,
) -> Result<ResolvedRoot> {
    let resolved = resolver::resolve(mib, spec, strategy)?;
    Ok(ResolvedRoot {
        tag: spec.tag().to_string(),
        oid: resolved.oid,
        node: resolved.node,
    })
}

/// Resolve every spec, failing on the first one that does not resolve.
pub(crate) fn resolve_all<M: MibTree + ?Sized>(
    mib: &M,
    specs: &[OidSpec],
    strategy: Strategy,
) -> Result<Vec<ResolvedRoot>> {
    specs
        .iter()
        .map(|spec| resolve_one(mib, spec, strategy))
        .collect()
}

/// One SET assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetItem {
    pub spec: OidSpec,
    /// Value in its string form; `None` only yields a marshalling failure.
    pub value: Option<String>,
    /// Type to use when the MIB does not know the object, as a keyword
    /// (`"INTEGER"`, `"OCTETSTR"`) or shorthand (`"i"`, `"s"`).
    pub ty: Option<String>,
}

impl SetItem {
    /// Assignment typed by the MIB.
    pub fn new(spec: impl Into<OidSpec>, value: impl Into<String>) -> Self {
        Self {
            spec: spec.into(),
            value: Some(value.into()),
            ty: None,
        }
    }

    /// Fallback type for objects the MIB does not describe.
    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }
}

impl<S: Into<OidSpec>, V: Into<String>> From<(S, V)> for SetItem {
    fn from((spec, value): (S, V)) -> Self {
        Self::new(spec, value)
    }
}

/// Turn SET assignments into varbinds.
///
/// The MIB type of the object wins over the caller's type string. Every
/// value is parsed even after a failure so that all bad values are
/// reported together.
pub(crate) fn build_set<M: MibTree + ?Sized>(
    mib: &M,
    items: &[SetItem],
    strategy: Strategy,
) -> Result<Vec<VarBind>> {
    let mut varbinds = Vec::with_capacity(items.len());
    let mut failures = Vec::new();

    for item in items {
        let root = resolve_one(mib, &item.spec, strategy)?;
        let ty = root
            .node
            .as_ref()
            .and_then(|node| node.ty)
            .or_else(|| item.ty.as_deref().and_then(SnmpType::from_name))
            .ok_or_else(|| Error::UndeterminedType {
                tag: item.spec.to_string(),
            })?;

        let input = match (ty, item.value.as_deref()) {
            (SnmpType::Integer, Some(value)) => {
                Some(codec::resolve_enum_label(value, root.node.as_deref()))
            }
            (_, value) => value.map(Into::into),
        };

        let value = match codec::parse(mib, input.as_deref(), ty) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(
                    target: "async_snmp_session::codec",
                    { snmp.tag = %item.spec, snmp_type = %ty },
                    "cannot encode SET value"
                );
                failures.push(ValueFailure {
                    tag: item.spec.to_string(),
                    ty,
                    input: item.value.clone(),
                });
                err.placeholder
            }
        };
        varbinds.push(VarBind::new(root.oid, value));
    }

    if failures.is_empty() {
        Ok(varbinds)
    } else {
        Err(Error::InvalidValue { failures })
    }
}
