//! Property-based tests for resolution, value marshalling and the
//! noSuchName retry loop.

mod common;

use async_snmp_session::codec::{self, render_basic};
use async_snmp_session::mib::MibTable;
use async_snmp_session::oid::{self, Oid};
use async_snmp_session::resolver::{self, Strategy as Resolve};
use async_snmp_session::types::SnmpType;
use async_snmp_session::{OidSpec, Session, Value, Version};
use common::{CountingMib, NoSuchMode, ScriptedAgent};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// Strategies
// =============================================================================

fn arb_arcs() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(any::<u32>(), 1..=40)
}

fn dotted(arcs: &[u32], leading_dot: bool) -> String {
    let body = arcs
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".");
    if leading_dot { format!(".{body}") } else { body }
}

/// Dotted strings with at least one letter somewhere.
fn arb_alpha_tag() -> impl Strategy<Value = String> {
    (arb_arcs(), any::<prop::sample::Index>(), "[a-zA-Z]").prop_map(|(arcs, at, letter)| {
        let mut tag = dotted(&arcs, false);
        let pos = at.index(tag.len() + 1);
        tag.insert_str(pos, &letter);
        tag
    })
}

// =============================================================================
// Resolution
// =============================================================================

proptest! {
    #[test]
    fn numeric_tags_never_touch_the_mib(arcs in arb_arcs(), leading_dot in any::<bool>()) {
        let mib = CountingMib::new();
        let tag = dotted(&arcs, leading_dot);
        for strategy in [Resolve::Exact, Resolve::WildcardBestGuess, Resolve::RandomBestGuess] {
            let resolved = resolver::resolve(&*mib, &OidSpec::new(tag.as_str()), strategy).unwrap();
            prop_assert_eq!(resolved.oid, Oid::new(arcs.iter().copied()));
        }
        prop_assert_eq!(mib.symbolic_lookups(), 0);
    }

    #[test]
    fn alphabetic_tags_are_not_numeric(tag in arb_alpha_tag()) {
        prop_assert!(!oid::is_numeric_tag(&tag));
        prop_assert!(oid::parse_numeric(&tag).is_err());
    }
}

// =============================================================================
// Value codec
// =============================================================================

fn round_trip(input: &str, ty: SnmpType) -> Option<String> {
    let mib = MibTable::well_known();
    codec::parse(&mib, Some(input), ty).ok().map(|v| render_basic(&v))
}

proptest! {
    #[test]
    fn integer_round_trip(v in any::<i32>()) {
        let s = v.to_string();
        prop_assert_eq!(round_trip(&s, SnmpType::Integer), Some(s));
    }

    #[test]
    fn octet_string_round_trip(s in "[ -~]{0,64}") {
        prop_assert_eq!(round_trip(&s, SnmpType::OctetStr), Some(s));
    }

    #[test]
    fn ip_address_round_trip(octets in any::<[u8; 4]>()) {
        let s = std::net::Ipv4Addr::from(octets).to_string();
        prop_assert_eq!(round_trip(&s, SnmpType::IpAddr), Some(s));
    }

    #[test]
    fn object_id_round_trip(arcs in arb_arcs()) {
        let s = dotted(&arcs, true);
        prop_assert_eq!(round_trip(&s, SnmpType::ObjectId), Some(s));
    }
}

// =============================================================================
// noSuchName retry
// =============================================================================

fn arb_batch() -> impl Strategy<Value = (usize, BTreeSet<usize>)> {
    (1usize..=30).prop_flat_map(|n| (Just(n), prop::collection::btree_set(0..n, 0..=n)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn retry_elides_exactly_the_missing(
        (n, missing) in arb_batch(),
        ascending in any::<bool>(),
    ) {
        let base = Oid::from_slice(&[1, 3, 6, 1, 4, 1, 99]);
        let mut data = BTreeMap::new();
        for pos in 0..n as u32 {
            if !missing.contains(&(pos as usize)) {
                data.insert(base.child(pos).child(0), Value::Integer(pos as i32));
            }
        }
        let mode = if ascending { NoSuchMode::Ascending } else { NoSuchMode::Descending };
        let agent = ScriptedAgent::new(data).with_mode(mode);
        let tags: Vec<String> = (0..n).map(|pos| format!("{}.{pos}.0", base.to_dotted())).collect();

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let vars = runtime.block_on(async {
            let mut session = Session::builder(agent.clone())
                .version(Version::V1)
                .retry_no_such(true)
                .max_oids_per_request(n)
                .build();
            session.get(tags.iter().map(String::as_str)).await
        }).unwrap();

        prop_assert_eq!(vars.len(), n - missing.len());
        let expected: Vec<String> = (0..n)
            .filter(|pos| !missing.contains(pos))
            .map(|pos| pos.to_string())
            .collect();
        let values: Vec<String> = vars.iter().filter_map(|v| v.value.clone()).collect();
        prop_assert_eq!(values, expected);
        prop_assert!(agent.requests().len() <= missing.len() + 1);
    }
}
