//! Response scanning for GET and subtree walks.
//!
//! Every returned varbind is classified the same way: `endOfMibView` and a
//! name outside the requested subtree end the root silently, the two
//! `noSuch*` exceptions end it with one exception record, anything else
//! becomes a [`Variable`].

use crate::codec::{self, RenderMode};
use crate::error::{Error, Result};
use crate::label::{self, NameFlags};
use crate::mib::{LabelFormat, MibTree};
use crate::oid::Oid;
use crate::request::ResolvedRoot;
use crate::types::SnmpType;
use crate::value::Value;
use crate::varbind::VarBind;
use crate::variable::Variable;

/// Turns response varbinds into result records.
pub(crate) struct Reader<'a, M: MibTree + ?Sized> {
    mib: &'a M,
    format: LabelFormat,
    mode: RenderMode,
    fail_on_null_iid: bool,
}

impl<'a, M: MibTree + ?Sized> Reader<'a, M> {
    pub(crate) fn new(
        mib: &'a M,
        format: LabelFormat,
        mode: RenderMode,
        fail_on_null_iid: bool,
    ) -> Self {
        Self {
            mib,
            format,
            mode,
            fail_on_null_iid,
        }
    }

    /// Build the record for a returned varbind.
    ///
    /// A name that cannot be split keeps the whole rendered name as its
    /// label with an empty instance id.
    pub(crate) fn read(&self, root_tag: &str, vb: &VarBind) -> Variable {
        let name = self.mib.format_name(&vb.oid, self.format);
        let node = self.mib.node_by_oid(&vb.oid);
        let flags = NameFlags {
            numeric: self.format == LabelFormat::Numeric,
            long_names: self.format != LabelFormat::Suffix,
            fail_on_null_iid: self.fail_on_null_iid,
            non_leaf: node.as_ref().is_some_and(|n| !self.mib.is_leaf(n)),
        };
        let (oid, oid_index) = match label::split_label_iid(&name, flags) {
            Some((label, iid)) => (label.into_owned(), iid.to_string()),
            None => (name.clone(), String::new()),
        };

        Variable {
            root_oid: root_tag.to_string(),
            oid,
            oid_index,
            snmp_type: SnmpType::from_wire_tag(vb.value.tag()),
            value: Some(codec::render(
                self.mib,
                &vb.oid,
                &vb.value,
                node.as_deref(),
                self.mode,
            )),
        }
    }
}

/// How one returned varbind relates to its root.
#[derive(Debug)]
pub(crate) enum Step {
    Value(Variable),
    /// `noSuchObject`/`noSuchInstance`; ends the root.
    Exception(Variable),
    /// `endOfMibView` or out of subtree; ends the root with no record.
    End,
}

/// Classify `vb` against `root`. The subtree test is skipped when
/// `in_subtree` is false (single GETNEXT/GETBULK exchanges).
///
/// Exception records name only the root tag; their instance id is empty.
pub(crate) fn classify<M: MibTree + ?Sized>(
    reader: &Reader<'_, M>,
    root: &ResolvedRoot,
    vb: &VarBind,
    in_subtree: bool,
) -> Step {
    match vb.value {
        Value::EndOfMibView => Step::End,
        Value::NoSuchObject | Value::NoSuchInstance => Step::Exception(Variable {
            root_oid: root.tag.clone(),
            oid: root.tag.clone(),
            oid_index: String::new(),
            snmp_type: SnmpType::from_wire_tag(vb.value.tag()),
            value: None,
        }),
        _ if in_subtree && !vb.oid.starts_with(&root.oid) => {
            tracing::trace!(
                target: "async_snmp_session::walk",
                { snmp.root = %root.oid, snmp.oid = %vb.oid },
                "left subtree"
            );
            Step::End
        }
        _ => Step::Value(reader.read(&root.tag, vb)),
    }
}

/// Traversal state for one walk root.
#[derive(Debug)]
pub(crate) struct RootWalk<'r> {
    root: &'r ResolvedRoot,
    current: Oid,
    last: Option<Oid>,
    done: bool,
}

impl<'r> RootWalk<'r> {
    pub(crate) fn new(root: &'r ResolvedRoot) -> Self {
        Self {
            root,
            current: root.oid.clone(),
            last: None,
            done: false,
        }
    }

    /// Where the next request starts, or `None` once the root is exhausted.
    pub(crate) fn next_oid(&self) -> Option<&Oid> {
        (!self.done).then_some(&self.current)
    }

    /// Mark the root exhausted without scanning anything.
    pub(crate) fn finish(&mut self) {
        self.done = true;
    }

    /// Scan one response in order, appending records to `out`.
    ///
    /// The next request continues from the last returned name.
    pub(crate) fn scan<M: MibTree + ?Sized>(
        &mut self,
        reader: &Reader<'_, M>,
        varbinds: &[VarBind],
        out: &mut Vec<Variable>,
    ) -> Result<()> {
        if varbinds.is_empty() {
            self.done = true;
            return Ok(());
        }

        for vb in varbinds {
            tracing::trace!(
                target: "async_snmp_session::walk",
                { snmp.oid = %vb.oid },
                "scanning"
            );
            match classify(reader, self.root, vb, true) {
                Step::End => {
                    self.done = true;
                    return Ok(());
                }
                Step::Exception(record) => {
                    out.push(record);
                    self.done = true;
                    return Ok(());
                }
                Step::Value(record) => {
                    if let Some(last) = &self.last
                        && vb.oid <= *last
                    {
                        tracing::debug!(
                            target: "async_snmp_session::walk",
                            { previous = %last, current = %vb.oid },
                            "non-increasing OID"
                        );
                        return Err(Error::NonIncreasingOid {
                            previous: last.clone(),
                            current: vb.oid.clone(),
                        });
                    }
                    out.push(record);
                    self.last = Some(vb.oid.clone());
                }
            }
        }

        if let Some(last) = &self.last {
            self.current = last.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mib::MibTable;
    use crate::oid;

    fn system_root() -> ResolvedRoot {
        ResolvedRoot {
            tag: "system".into(),
            oid: oid!(1, 3, 6, 1, 2, 1, 1),
            node: None,
        }
    }

    fn text(oid: Oid, s: &str) -> VarBind {
        VarBind::new(oid, Value::from(s))
    }

    #[test]
    fn test_read_splits_suffix_name() {
        let mib = MibTable::well_known();
        let reader = Reader::new(&mib, LabelFormat::Suffix, RenderMode::Basic, false);
        let var = reader.read("sysDescr", &text(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), "Linux"));
        assert_eq!(var.oid, "sysDescr");
        assert_eq!(var.oid_index, "0");
        assert_eq!(var.snmp_type, SnmpType::OctetStr);
        assert_eq!(var.value.as_deref(), Some("Linux"));
        assert_eq!(var.root_oid, "sysDescr");
    }

    #[test]
    fn test_read_numeric_name() {
        let mib = MibTable::well_known();
        let reader = Reader::new(&mib, LabelFormat::Numeric, RenderMode::Basic, false);
        let var = reader.read("x", &text(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), "r1"));
        assert_eq!(var.oid, ".1.3.6.1.2.1.1.5");
        assert_eq!(var.oid_index, "0");
    }

    #[test]
    fn test_scan_continues_from_last_name() {
        let mib = MibTable::well_known();
        let reader = Reader::new(&mib, LabelFormat::Suffix, RenderMode::Basic, false);
        let root = system_root();
        let mut walk = RootWalk::new(&root);
        let mut out = Vec::new();

        walk.scan(
            &reader,
            &[
                text(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), "a"),
                text(oid!(1, 3, 6, 1, 2, 1, 1, 4, 0), "b"),
            ],
            &mut out,
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(walk.next_oid(), Some(&oid!(1, 3, 6, 1, 2, 1, 1, 4, 0)));
    }

    #[test]
    fn test_scan_stops_outside_subtree() {
        let mib = MibTable::well_known();
        let reader = Reader::new(&mib, LabelFormat::Suffix, RenderMode::Basic, false);
        let root = system_root();
        let mut walk = RootWalk::new(&root);
        let mut out = Vec::new();

        walk.scan(
            &reader,
            &[VarBind::new(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(2))],
            &mut out,
        )
        .unwrap();
        assert!(out.is_empty());
        assert_eq!(walk.next_oid(), None);
    }

    #[test]
    fn test_scan_exception_record() {
        let mib = MibTable::well_known();
        let reader = Reader::new(&mib, LabelFormat::Suffix, RenderMode::Basic, false);
        let root = system_root();
        let mut walk = RootWalk::new(&root);
        let mut out = Vec::new();

        walk.scan(
            &reader,
            &[VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1), Value::NoSuchObject)],
            &mut out,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].oid, "system");
        assert_eq!(out[0].oid_index, "");
        assert_eq!(out[0].snmp_type, SnmpType::NoSuchObject);
        assert_eq!(out[0].value, None);
        assert!(walk.next_oid().is_none());
    }

    #[test]
    fn test_scan_rejects_non_increasing() {
        let mib = MibTable::well_known();
        let reader = Reader::new(&mib, LabelFormat::Suffix, RenderMode::Basic, false);
        let root = system_root();
        let mut walk = RootWalk::new(&root);
        let mut out = Vec::new();

        let err = walk
            .scan(
                &reader,
                &[
                    text(oid!(1, 3, 6, 1, 2, 1, 1, 4, 0), "b"),
                    text(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), "a"),
                ],
                &mut out,
            )
            .unwrap_err();
        assert!(matches!(err, Error::NonIncreasingOid { .. }));
    }

    #[test]
    fn test_empty_response_exhausts() {
        let mib = MibTable::well_known();
        let reader = Reader::new(&mib, LabelFormat::Suffix, RenderMode::Basic, false);
        let root = system_root();
        let mut walk = RootWalk::new(&root);
        walk.scan(&reader, &[], &mut Vec::new()).unwrap();
        assert!(walk.next_oid().is_none());
    }
}
