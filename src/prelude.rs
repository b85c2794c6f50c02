//! Prelude module for convenient imports.
//!
//! ```rust
//! use async_snmp_session::prelude::*;
//! ```
//!
//! This imports:
//! - The session: [`Session`], [`SessionConfig`], [`SetItem`], [`Variable`]
//! - Resolution: [`OidSpec`], [`Strategy`], [`MibTree`], [`MibTable`]
//! - Core types: [`Oid`], [`Value`], [`VarBind`], [`Pdu`]
//! - The engine seam: [`Engine`], [`Connect`], [`PeerConfig`]
//! - Error handling: [`Error`], [`Result`]
//! - The [`oid!`] macro

pub use crate::engine::{Connect, Engine, EngineError, PeerConfig};
pub use crate::error::{Error, Result};
pub use crate::label::OidSpec;
pub use crate::mib::{MibTable, MibTree};
pub use crate::oid::Oid;
pub use crate::pdu::Pdu;
pub use crate::request::SetItem;
pub use crate::resolver::Strategy;
pub use crate::session::{Session, SessionConfig, SharedSession};
pub use crate::value::Value;
pub use crate::varbind::VarBind;
pub use crate::variable::Variable;
pub use crate::version::Version;

#[doc(no_inline)]
pub use crate::oid;
