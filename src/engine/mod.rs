//! Engine abstraction.
//!
//! The session never touches sockets, BER or SNMPv3 security. It hands
//! decoded [`Pdu`]s to an [`Engine`] and gets the decoded response back.
//! Engines that need to be opened from a peer description implement
//! [`Connect`].

#[cfg(any(test, feature = "testing"))]
mod mock;

#[cfg(any(test, feature = "testing"))]
pub use mock::*;

use crate::pdu::Pdu;
use crate::version::Version;
use bytes::Bytes;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Failure reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// No response within the engine's timeout and retries.
    #[error("Timeout")]
    Timeout,
    /// Any other failure, with the engine's message and system error code.
    #[error("{message}")]
    Failed { message: String, code: i32 },
    /// The engine was closed.
    #[error("session closed")]
    Closed,
}

/// Request/response exchange with an SNMP agent.
///
/// Implementations own transport, encoding, security and transport-level
/// timeouts and retries.
pub trait Engine: Send + Sync {
    /// Send a request and wait for the matching response.
    fn send(&self, pdu: Pdu) -> impl Future<Output = Result<Pdu, EngineError>> + Send;

    /// Release the engine's resources.
    fn close(&self) {}
}

impl<E: Engine> Engine for Arc<E> {
    fn send(&self, pdu: Pdu) -> impl Future<Output = Result<Pdu, EngineError>> + Send {
        (**self).send(pdu)
    }

    fn close(&self) {
        (**self).close()
    }
}

/// Opens an [`Engine`] for a peer.
pub trait Connect {
    /// Engine produced by this connector.
    type Engine: Engine;

    /// Open a session with the peer.
    fn open(&self, peer: &PeerConfig)
    -> impl Future<Output = Result<Self::Engine, EngineError>> + Send;
}

/// What an engine needs to reach a peer.
///
/// The session passes this through without interpreting it.
#[derive(Debug, Clone)]
pub struct PeerConfig {
    /// Agent address, e.g. `192.168.1.1:161`.
    pub peer: String,
    /// Protocol version.
    pub version: Version,
    /// Community string (v1/v2c).
    pub community: Bytes,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after a timeout.
    pub retries: u32,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            peer: "localhost:161".to_string(),
            version: Version::V2c,
            community: Bytes::from_static(b"public"),
            timeout: Duration::from_secs(1),
            retries: 3,
        }
    }
}

impl PeerConfig {
    /// Peer with default settings.
    pub fn new(peer: impl Into<String>) -> Self {
        Self {
            peer: peer.into(),
            ..Default::default()
        }
    }
}
