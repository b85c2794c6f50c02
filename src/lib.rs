//! # async-snmp-session
//!
//! Session layer for SNMP clients: everything between a caller's symbolic
//! tags and the decoded PDUs an SNMP engine exchanges with an agent.
//!
//! - Resolve tags such as `sysDescr.0`, `IF-MIB::ifDescr.2` or
//!   `.1.3.6.1.2.1.1.5.0` against a [`MibTree`](mib::MibTree)
//!   ([`resolver`]).
//! - Marshal SET strings into typed values and render response values as
//!   strings ([`codec`]).
//! - GET, GETNEXT, GETBULK, subtree walks and SET through a pluggable
//!   [`Engine`](engine::Engine) ([`Session`]).
//! - Retry batched SNMPv1 GETs that fail with `noSuchName` ([`retry`]).
//!
//! The crate does no I/O of its own. Transport, BER encoding and SNMPv3
//! security belong to the engine; MIB file parsing belongs to whatever
//! loads the [`MibTree`](mib::MibTree).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use async_snmp_session::engine::{Connect, PeerConfig};
//! use async_snmp_session::{Session, Strategy};
//!
//! async fn poll<C: Connect>(connector: &C) -> async_snmp_session::Result<()> {
//!     let peer = PeerConfig::new("192.0.2.1:161");
//!     let mut session = Session::connect(connector, &peer)
//!         .await?
//!         .strategy(Strategy::WildcardBestGuess)
//!         .use_enums(true)
//!         .build();
//!
//!     for var in session.walk(["ifDescr", "ifOperStatus"]).await? {
//!         println!("{}.{} = {:?}", var.oid, var.oid_index, var.value);
//!     }
//!     session.set([("sysContact.0", "noc@example.net")]).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Results
//!
//! Operations return [`Variable`] records. `oid` and `oid_index` are the
//! response name split into label and instance; `root_oid` is the tag the
//! record answers. Walks end a root silently at `endOfMibView` or when the
//! agent leaves the subtree; a `noSuchObject`/`noSuchInstance` ends it
//! with one record carrying the exception type and no value.
//!
//! ## Errors
//!
//! Every failure is an [`Error`]. The session also keeps the last error
//! as an [`ErrorState`](error::ErrorState) snapshot (message, code,
//! index), cleared when the next operation starts.
//!
//! ## Logging
//!
//! Diagnostics are emitted with [`tracing`] under targets named
//! `async_snmp_session::<component>`. The library never installs a
//! subscriber.
//!
//! ## Feature flags
//!
//! - `serde`: `Serialize`/`Deserialize` for configuration types and
//!   `Serialize` for [`Variable`].
//! - `testing`: exposes [`engine::MockEngine`] for downstream tests.

pub mod codec;
pub mod engine;
pub mod error;
pub mod label;
pub mod mib;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod resolver;
pub mod retry;
pub mod tag;
pub mod types;
pub mod value;
pub mod varbind;
pub mod variable;
pub mod version;

mod request;
mod session;
mod walk;

pub use codec::RenderMode;
pub use error::{Error, ErrorState, ErrorStatus, Result};
pub use label::OidSpec;
pub use mib::{LabelFormat, MibNode, MibTable, MibTree};
pub use oid::Oid;
pub use pdu::{Pdu, PduType};
pub use request::SetItem;
pub use resolver::Strategy;
pub use session::{Session, SessionBuilder, SessionConfig, SharedSession};
pub use types::SnmpType;
pub use value::Value;
pub use varbind::VarBind;
pub use variable::{RealValue, Variable};
pub use version::Version;
