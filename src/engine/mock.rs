//! Mock engine for testing.
//!
//! Replays queued responses in order and records every request, so tests
//! can drive the session without an agent.

use super::{Connect, Engine, EngineError, PeerConfig};
use crate::error::ErrorStatus;
use crate::pdu::Pdu;
use crate::varbind::VarBind;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// A scripted reply.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Respond with these varbinds (request id copied from the request).
    Varbinds(Vec<VarBind>),
    /// Respond with an error status and index, echoing the request varbinds.
    Error { status: ErrorStatus, index: i32 },
    /// Fail the exchange.
    Fail(EngineError),
}

struct MockEngineInner {
    responses: VecDeque<MockResponse>,
    requests: Vec<Pdu>,
    closed: bool,
}

/// Engine that answers from a queue.
///
/// # Example
///
/// ```rust
/// use async_snmp_session::engine::MockEngine;
/// use async_snmp_session::{VarBind, Value, oid};
///
/// let mock = MockEngine::new();
/// mock.queue_varbinds(vec![VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("r1"))]);
/// mock.queue_timeout();
/// assert_eq!(mock.pending(), 2);
/// ```
#[derive(Clone)]
pub struct MockEngine {
    inner: Arc<Mutex<MockEngineInner>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    /// Create a mock with an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockEngineInner {
                responses: VecDeque::new(),
                requests: Vec::new(),
                closed: false,
            })),
        }
    }

    /// Queue a successful response.
    pub fn queue_varbinds(&self, varbinds: Vec<VarBind>) {
        self.queue(MockResponse::Varbinds(varbinds));
    }

    /// Queue an error-status response.
    pub fn queue_error(&self, status: ErrorStatus, index: i32) {
        self.queue(MockResponse::Error { status, index });
    }

    /// Queue a timeout.
    pub fn queue_timeout(&self) {
        self.queue(MockResponse::Fail(EngineError::Timeout));
    }

    /// Queue any reply.
    pub fn queue(&self, response: MockResponse) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.push_back(response);
    }

    /// Replies not yet consumed.
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().responses.len()
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<Pdu> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Whether [`Engine::close`] was called.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }
}

impl Engine for MockEngine {
    fn send(&self, pdu: Pdu) -> impl Future<Output = Result<Pdu, EngineError>> + Send {
        let result = {
            let mut inner = self.inner.lock().unwrap();
            inner.requests.push(pdu.clone());
            if inner.closed {
                Err(EngineError::Closed)
            } else {
                match inner.responses.pop_front() {
                    Some(MockResponse::Varbinds(varbinds)) => {
                        Ok(Pdu::response(pdu.request_id, varbinds))
                    }
                    Some(MockResponse::Error { status, index }) => {
                        Ok(pdu.to_error_response(status, index))
                    }
                    Some(MockResponse::Fail(err)) => Err(err),
                    None => Err(EngineError::Timeout),
                }
            }
        };
        async move { result }
    }

    fn close(&self) {
        self.inner.lock().unwrap().closed = true;
    }
}

/// Connector handing out clones of one [`MockEngine`].
#[derive(Clone, Default)]
pub struct MockConnector {
    pub engine: MockEngine,
    /// When set, opening fails with this error.
    pub fail_with: Option<EngineError>,
}

impl Connect for MockConnector {
    type Engine = MockEngine;

    fn open(&self, _peer: &PeerConfig) -> impl Future<Output = Result<MockEngine, EngineError>> + Send {
        let result = match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(self.engine.clone()),
        };
        async move { result }
    }
}
