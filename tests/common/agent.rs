//! Scripted in-memory agent.
//!
//! Answers GET, GETNEXT, GETBULK and SET from a sorted map and records
//! every request it sees.

use async_snmp_session::engine::{Engine, EngineError};
use async_snmp_session::{ErrorStatus, Oid, Pdu, PduType, VarBind, Value};
use std::collections::BTreeMap;
use std::future::Future;
use std::ops::Bound;
use std::sync::{Arc, Mutex};

/// How the agent reports OIDs it does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoSuchMode {
    /// SNMPv2 style: exception values in place.
    Exceptions,
    /// SNMPv1 style, naming the last missing position first.
    Descending,
    /// SNMPv1 style, naming the first missing position first.
    Ascending,
}

struct State {
    data: BTreeMap<Oid, Value>,
    mode: NoSuchMode,
    end_of_view_on: Option<usize>,
    getnext_calls: usize,
    failure: Option<EngineError>,
    requests: Vec<Pdu>,
}

#[derive(Clone)]
pub struct ScriptedAgent {
    state: Arc<Mutex<State>>,
}

impl ScriptedAgent {
    pub fn new(data: BTreeMap<Oid, Value>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                data,
                mode: NoSuchMode::Exceptions,
                end_of_view_on: None,
                getnext_calls: 0,
                failure: None,
                requests: Vec::new(),
            })),
        }
    }

    pub fn with_mode(self, mode: NoSuchMode) -> Self {
        self.state.lock().unwrap().mode = mode;
        self
    }

    /// Answer the `call`th GETNEXT (1-based) with `endOfMibView`.
    pub fn end_of_view_on(self, call: usize) -> Self {
        self.state.lock().unwrap().end_of_view_on = Some(call);
        self
    }

    /// Fail every exchange with `err` instead of answering.
    pub fn failing_with(self, err: EngineError) -> Self {
        self.state.lock().unwrap().failure = Some(err);
        self
    }

    pub fn requests(&self) -> Vec<Pdu> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn value(&self, oid: &Oid) -> Option<Value> {
        self.state.lock().unwrap().data.get(oid).cloned()
    }

    fn handle(&self, pdu: Pdu) -> Pdu {
        let mut state = self.state.lock().unwrap();
        state.requests.push(pdu.clone());
        match pdu.pdu_type {
            PduType::GetRequest => state.get(&pdu),
            PduType::GetNextRequest => {
                state.getnext_calls += 1;
                if state.end_of_view_on == Some(state.getnext_calls) {
                    let varbinds = pdu
                        .oids()
                        .map(|oid| VarBind::new(oid.clone(), Value::EndOfMibView))
                        .collect();
                    return Pdu::response(pdu.request_id, varbinds);
                }
                state.get_next(&pdu)
            }
            PduType::GetBulkRequest => state.get_bulk(&pdu),
            PduType::SetRequest => {
                for vb in &pdu.varbinds {
                    state.data.insert(vb.oid.clone(), vb.value.clone());
                }
                Pdu::response(pdu.request_id, pdu.varbinds.clone())
            }
            PduType::Response => pdu.to_error_response(ErrorStatus::GenErr, 0),
        }
    }
}

impl State {
    fn successor(&self, oid: &Oid) -> Option<(&Oid, &Value)> {
        self.data
            .range((Bound::Excluded(oid.clone()), Bound::Unbounded))
            .next()
    }

    fn missing_position(&self, missing: &[usize]) -> Option<usize> {
        match self.mode {
            NoSuchMode::Exceptions => None,
            NoSuchMode::Descending => missing.last().copied(),
            NoSuchMode::Ascending => missing.first().copied(),
        }
    }

    fn get(&self, pdu: &Pdu) -> Pdu {
        let missing: Vec<usize> = pdu
            .oids()
            .enumerate()
            .filter(|(_, oid)| !self.data.contains_key(*oid))
            .map(|(pos, _)| pos)
            .collect();
        if let Some(pos) = self.missing_position(&missing) {
            return pdu.to_error_response(ErrorStatus::NoSuchName, pos as i32 + 1);
        }

        let varbinds = pdu
            .oids()
            .map(|oid| {
                let value = self.data.get(oid).cloned().unwrap_or(Value::NoSuchInstance);
                VarBind::new(oid.clone(), value)
            })
            .collect();
        Pdu::response(pdu.request_id, varbinds)
    }

    fn get_next(&self, pdu: &Pdu) -> Pdu {
        let mut varbinds = Vec::new();
        for (pos, oid) in pdu.oids().enumerate() {
            match self.successor(oid) {
                Some((next, value)) => varbinds.push(VarBind::new(next.clone(), value.clone())),
                None if self.mode == NoSuchMode::Exceptions => {
                    varbinds.push(VarBind::new(oid.clone(), Value::EndOfMibView))
                }
                None => return pdu.to_error_response(ErrorStatus::NoSuchName, pos as i32 + 1),
            }
        }
        Pdu::response(pdu.request_id, varbinds)
    }

    fn get_bulk(&self, pdu: &Pdu) -> Pdu {
        let oids: Vec<Oid> = pdu.oids().cloned().collect();
        let non_repeaters = (pdu.error_status.max(0) as usize).min(oids.len());
        let max_repetitions = pdu.error_index.max(0) as usize;
        let mut varbinds = Vec::new();

        let step = |oid: &Oid| match self.successor(oid) {
            Some((next, value)) => VarBind::new(next.clone(), value.clone()),
            None => VarBind::new(oid.clone(), Value::EndOfMibView),
        };

        for oid in &oids[..non_repeaters] {
            varbinds.push(step(oid));
        }
        let mut cursors: Vec<Oid> = oids[non_repeaters..].to_vec();
        for _ in 0..max_repetitions {
            if cursors.is_empty() {
                break;
            }
            let mut all_ended = true;
            for cursor in cursors.iter_mut() {
                let vb = step(cursor);
                if vb.value != Value::EndOfMibView {
                    all_ended = false;
                }
                *cursor = vb.oid.clone();
                varbinds.push(vb);
            }
            if all_ended {
                break;
            }
        }
        Pdu::response(pdu.request_id, varbinds)
    }
}

impl Engine for ScriptedAgent {
    fn send(&self, pdu: Pdu) -> impl Future<Output = Result<Pdu, EngineError>> + Send {
        let failure = self.state.lock().unwrap().failure.clone();
        let response = match failure {
            Some(err) => {
                self.state.lock().unwrap().requests.push(pdu);
                Err(err)
            }
            None => Ok(self.handle(pdu)),
        };
        async move { response }
    }
}
