//! SNMP session.
//!
//! A [`Session`] couples an [`Engine`] with a [`MibTree`] and the options
//! that govern resolution, result naming and value rendering. Every
//! operation resolves its tags up front, runs its exchanges through the
//! engine and returns the collected [`Variable`]s, or an error with the
//! session's [`ErrorState`] updated to match.
//!
//! # Example
//!
//! ```rust
//! use async_snmp_session::engine::{Engine, EngineError};
//! use async_snmp_session::{Pdu, Session, VarBind, Value};
//!
//! /// Answers every request with the same string.
//! struct Fixed;
//!
//! impl Engine for Fixed {
//!     async fn send(&self, pdu: Pdu) -> Result<Pdu, EngineError> {
//!         let varbinds = pdu
//!             .oids()
//!             .map(|oid| VarBind::new(oid.clone(), Value::from("Linux r1")))
//!             .collect();
//!         Ok(Pdu::response(pdu.request_id, varbinds))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> async_snmp_session::Result<()> {
//! let mut session = Session::builder(Fixed).build();
//! let vars = session.get(["sysDescr.0"]).await?;
//! assert_eq!(vars[0].oid, "sysDescr");
//! assert_eq!(vars[0].oid_index, "0");
//! assert_eq!(vars[0].value.as_deref(), Some("Linux r1"));
//! # Ok(())
//! # }
//! ```

mod shared;

pub use shared::SharedSession;

use crate::codec::RenderMode;
use crate::engine::{Connect, Engine, EngineError, PeerConfig};
use crate::error::{Error, ErrorState, ErrorStatus, Result};
use crate::label::OidSpec;
use crate::mib::{LabelFormat, MibTable, MibTree};
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::request::{self, ResolvedRoot, SetItem};
use crate::resolver::Strategy;
use crate::retry::NoSuchRetry;
use crate::variable::Variable;
use crate::version::Version;
use crate::walk::{self, Reader, RootWalk, Step};
use std::sync::Arc;
use tracing::instrument;

/// Options read at the start of every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Protocol version; GETBULK needs v2c or later.
    pub version: Version,
    /// How symbolic tags are resolved.
    pub strategy: Strategy,
    /// Result labels keep the full symbolic path.
    pub use_long_names: bool,
    /// Result labels are dotted numeric. Implies long names.
    pub use_numeric: bool,
    /// INTEGER values with an enumeration label render as the label.
    pub use_enums: bool,
    /// Values render the way the MIB describes them. Wins over `use_enums`.
    pub use_sprint_value: bool,
    /// Retry batched GETs that fail with `noSuchName`, dropping the
    /// offending OIDs.
    pub retry_no_such: bool,
    /// Response names without a numeric instance id are not split.
    pub fail_on_null_iid: bool,
    /// Maximum OIDs per GET request.
    pub max_oids_per_request: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: Version::V2c,
            strategy: Strategy::Exact,
            use_long_names: false,
            use_numeric: false,
            use_enums: false,
            use_sprint_value: false,
            retry_no_such: false,
            fail_on_null_iid: false,
            max_oids_per_request: 10,
        }
    }
}

impl SessionConfig {
    /// How result names are rendered.
    pub fn label_format(&self) -> LabelFormat {
        if self.use_numeric {
            LabelFormat::Numeric
        } else if self.use_long_names {
            LabelFormat::Full
        } else {
            LabelFormat::Suffix
        }
    }

    /// How result values are rendered.
    pub fn render_mode(&self) -> RenderMode {
        if self.use_sprint_value {
            RenderMode::AgentFormatted
        } else if self.use_enums {
            RenderMode::Enum
        } else {
            RenderMode::Basic
        }
    }
}

/// Builder for [`Session`].
pub struct SessionBuilder<E> {
    engine: E,
    mib: Option<Arc<dyn MibTree>>,
    config: SessionConfig,
}

impl<E: Engine> SessionBuilder<E> {
    /// Use this MIB instead of [`MibTable::well_known`].
    pub fn mib(mut self, mib: impl MibTree + 'static) -> Self {
        self.mib = Some(Arc::new(mib));
        self
    }

    /// Share an already loaded MIB.
    pub fn shared_mib(mut self, mib: Arc<dyn MibTree>) -> Self {
        self.mib = Some(mib);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.config.version = version;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn use_long_names(mut self, enabled: bool) -> Self {
        self.config.use_long_names = enabled;
        self
    }

    pub fn use_numeric(mut self, enabled: bool) -> Self {
        self.config.use_numeric = enabled;
        self
    }

    pub fn use_enums(mut self, enabled: bool) -> Self {
        self.config.use_enums = enabled;
        self
    }

    pub fn use_sprint_value(mut self, enabled: bool) -> Self {
        self.config.use_sprint_value = enabled;
        self
    }

    pub fn retry_no_such(mut self, enabled: bool) -> Self {
        self.config.retry_no_such = enabled;
        self
    }

    pub fn fail_on_null_iid(mut self, enabled: bool) -> Self {
        self.config.fail_on_null_iid = enabled;
        self
    }

    /// Set the maximum OIDs per GET request. Zero is treated as one.
    pub fn max_oids_per_request(mut self, max: usize) -> Self {
        self.config.max_oids_per_request = max;
        self
    }

    pub fn build(self) -> Session<E> {
        Session {
            engine: self.engine,
            mib: self
                .mib
                .unwrap_or_else(|| Arc::new(MibTable::well_known())),
            config: self.config,
            error: ErrorState::default(),
            next_request_id: 1,
        }
    }
}

/// An SNMP session.
///
/// Operations take `&mut self`, so a session runs one operation at a time.
/// Wrap it in a [`SharedSession`] to use it from several tasks.
pub struct Session<E> {
    engine: E,
    mib: Arc<dyn MibTree>,
    config: SessionConfig,
    error: ErrorState,
    next_request_id: i32,
}

impl<E: Engine> Session<E> {
    /// Start building a session over an open engine.
    pub fn builder(engine: E) -> SessionBuilder<E> {
        SessionBuilder {
            engine,
            mib: None,
            config: SessionConfig::default(),
        }
    }

    /// Open an engine for `peer` and build a session over it.
    ///
    /// The peer's version becomes the session's version.
    pub async fn connect<C>(connector: &C, peer: &PeerConfig) -> Result<SessionBuilder<E>>
    where
        C: Connect<Engine = E>,
    {
        let engine = connector.open(peer).await.map_err(|err| {
            tracing::debug!(
                target: "async_snmp_session::session",
                { snmp.peer = %peer.peer, error = %err },
                "open failed"
            );
            Error::Connection {
                message: err.to_string(),
            }
        })?;
        Ok(Self::builder(engine).version(peer.version))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Change options for subsequent operations.
    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }

    /// Error recorded by the most recent operation.
    pub fn last_error(&self) -> &ErrorState {
        &self.error
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Close the engine.
    pub fn close(self) {
        self.engine.close();
    }

    /// GET the given tags.
    ///
    /// Tags are sent in batches of `max_oids_per_request`. A `noSuchName`
    /// response is retried without the offending OIDs when
    /// `retry_no_such` is set; those OIDs produce no record.
    #[instrument(level = "debug", skip_all, fields(snmp.tag_count = tracing::field::Empty))]
    pub async fn get<I>(&mut self, specs: I) -> Result<Vec<Variable>>
    where
        I: IntoIterator,
        I::Item: Into<OidSpec>,
    {
        let specs = collect_specs(specs);
        tracing::Span::current().record("snmp.tag_count", specs.len());
        self.begin();
        let result = self.run_get(&specs).await;
        self.finish(result)
    }

    /// GETNEXT the given tags in one request.
    #[instrument(level = "debug", skip_all, fields(snmp.tag_count = tracing::field::Empty))]
    pub async fn get_next<I>(&mut self, specs: I) -> Result<Vec<Variable>>
    where
        I: IntoIterator,
        I::Item: Into<OidSpec>,
    {
        let specs = collect_specs(specs);
        tracing::Span::current().record("snmp.tag_count", specs.len());
        self.begin();
        let result = self.run_get_next(&specs).await;
        self.finish(result)
    }

    /// GETBULK the given tags in one request.
    ///
    /// The first `non_repeaters` tags get one successor each, the rest up
    /// to `max_repetitions`.
    #[instrument(level = "debug", skip_all, fields(snmp.tag_count = tracing::field::Empty, non_repeaters = non_repeaters, max_repetitions = max_repetitions))]
    pub async fn get_bulk<I>(
        &mut self,
        specs: I,
        non_repeaters: i32,
        max_repetitions: i32,
    ) -> Result<Vec<Variable>>
    where
        I: IntoIterator,
        I::Item: Into<OidSpec>,
    {
        let specs = collect_specs(specs);
        tracing::Span::current().record("snmp.tag_count", specs.len());
        self.begin();
        let result = self
            .run_get_bulk(&specs, non_repeaters, max_repetitions)
            .await;
        self.finish(result)
    }

    /// Walk the subtree under each tag with GETNEXT.
    ///
    /// Results are ordered root by root. Roots that do not resolve are
    /// skipped; the operation fails only if none resolves.
    #[instrument(level = "debug", skip_all, fields(snmp.tag_count = tracing::field::Empty))]
    pub async fn walk<I>(&mut self, specs: I) -> Result<Vec<Variable>>
    where
        I: IntoIterator,
        I::Item: Into<OidSpec>,
    {
        let specs = collect_specs(specs);
        tracing::Span::current().record("snmp.tag_count", specs.len());
        self.begin();
        let result = self.run_walk(&specs, None).await;
        self.finish(result)
    }

    /// Walk the subtree under each tag with GETBULK.
    #[instrument(level = "debug", skip_all, fields(snmp.tag_count = tracing::field::Empty, non_repeaters = non_repeaters, max_repetitions = max_repetitions))]
    pub async fn bulk_walk<I>(
        &mut self,
        specs: I,
        non_repeaters: i32,
        max_repetitions: i32,
    ) -> Result<Vec<Variable>>
    where
        I: IntoIterator,
        I::Item: Into<OidSpec>,
    {
        let specs = collect_specs(specs);
        tracing::Span::current().record("snmp.tag_count", specs.len());
        self.begin();
        let result = match self.require_bulk("bulk walk") {
            Ok(()) => {
                self.run_walk(&specs, Some((non_repeaters, max_repetitions)))
                    .await
            }
            Err(err) => Err(err),
        };
        self.finish(result)
    }

    /// SET the given assignments in one request.
    ///
    /// Every value is checked before anything is sent. `noSuchName` is
    /// never retried.
    #[instrument(level = "debug", skip_all, fields(snmp.varbind_count = tracing::field::Empty))]
    pub async fn set<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<SetItem>,
    {
        let items: Vec<SetItem> = items.into_iter().map(Into::into).collect();
        tracing::Span::current().record("snmp.varbind_count", items.len());
        self.begin();
        let result = self.run_set(&items).await;
        self.finish(result)
    }

    fn begin(&mut self) {
        self.error.clear();
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.error.record(err);
            tracing::debug!(
                target: "async_snmp_session::session",
                { error = %err, code = self.error.code, index = self.error.index },
                "operation failed"
            );
        }
        result
    }

    fn request_id(&mut self) -> i32 {
        let id = self.next_request_id;
        self.next_request_id = self.next_request_id.checked_add(1).unwrap_or(1);
        id
    }

    fn reader<'m>(&self, mib: &'m (dyn MibTree + 'static)) -> Reader<'m, dyn MibTree> {
        Reader::new(
            mib,
            self.config.label_format(),
            self.config.render_mode(),
            self.config.fail_on_null_iid,
        )
    }

    fn require_bulk(&self, operation: &'static str) -> Result<()> {
        if self.config.version.supports_bulk() {
            Ok(())
        } else {
            Err(Error::Unsupported {
                operation,
                version: self.config.version,
            })
        }
    }

    /// Send one request and map engine failures.
    async fn exchange(&mut self, mut pdu: Pdu) -> Result<Pdu> {
        pdu.request_id = self.request_id();
        tracing::debug!(
            target: "async_snmp_session::session",
            {
                snmp.pdu_type = %pdu.pdu_type,
                snmp.request_id = pdu.request_id,
                snmp.varbind_count = pdu.varbinds.len()
            },
            "sending request"
        );

        let version = self.config.version;
        let response = self
            .engine
            .send(pdu)
            .await
            .map_err(|err| engine_error(err, version))?;

        tracing::debug!(
            target: "async_snmp_session::session",
            {
                snmp.request_id = response.request_id,
                snmp.error_status = response.error_status,
                snmp.error_index = response.error_index,
                snmp.varbind_count = response.varbinds.len()
            },
            "received response"
        );
        Ok(response)
    }

    async fn run_get(&mut self, specs: &[OidSpec]) -> Result<Vec<Variable>> {
        let mib = Arc::clone(&self.mib);
        let roots = request::resolve_all(&*mib, specs, self.config.strategy)?;
        let reader = self.reader(&*mib);
        let mut results = Vec::with_capacity(roots.len());

        for chunk in roots.chunks(self.config.max_oids_per_request.max(1)) {
            let oids: Vec<Oid> = chunk.iter().map(|root| root.oid.clone()).collect();
            let original = Pdu::get_request(0, &oids);
            let (response, positions) = self.get_with_retry(original).await?;

            for (vb, pos) in response.varbinds.iter().zip(positions) {
                let Some(root) = chunk.get(pos) else {
                    break;
                };
                match walk::classify(&reader, root, vb, true) {
                    Step::Value(var) | Step::Exception(var) => results.push(var),
                    Step::End => {}
                }
            }
        }
        Ok(results)
    }

    /// Run the GET exchange for one batch, retrying `noSuchName` when
    /// enabled. Returns the final response and, for each of its varbinds,
    /// the position in `original` it answers.
    async fn get_with_retry(&mut self, original: Pdu) -> Result<(Pdu, Vec<usize>)> {
        let mut retry = NoSuchRetry::new(original.varbinds.len());
        let mut request = original.clone();

        loop {
            let response = self.exchange(request).await?;
            match response.error_status_enum() {
                ErrorStatus::NoError => {
                    let positions = retry.into_invalid().valid_positions().collect();
                    return Ok((response, positions));
                }
                ErrorStatus::NoSuchName if self.config.retry_no_such => {
                    retry.record(response.error_index)?;
                    match retry.next_request(&original) {
                        Some(next) => request = next,
                        None => {
                            tracing::debug!(
                                target: "async_snmp_session::retry",
                                "every OID in the batch was elided"
                            );
                            return Ok((Pdu::response(response.request_id, Vec::new()), Vec::new()));
                        }
                    }
                }
                status => return Err(status_error(status, response.error_index)),
            }
        }
    }

    async fn run_get_next(&mut self, specs: &[OidSpec]) -> Result<Vec<Variable>> {
        let mib = Arc::clone(&self.mib);
        let roots = request::resolve_all(&*mib, specs, self.config.strategy)?;
        let oids: Vec<Oid> = roots.iter().map(|root| root.oid.clone()).collect();

        let response = self.exchange(Pdu::get_next_request(0, &oids)).await?;
        check_status(&response)?;

        let reader = self.reader(&*mib);
        Ok(read_all(&reader, &roots, &response, |pos| pos))
    }

    async fn run_get_bulk(
        &mut self,
        specs: &[OidSpec],
        non_repeaters: i32,
        max_repetitions: i32,
    ) -> Result<Vec<Variable>> {
        self.require_bulk("GETBULK")?;
        let mib = Arc::clone(&self.mib);
        let roots = request::resolve_all(&*mib, specs, self.config.strategy)?;
        let oids: Vec<Oid> = roots.iter().map(|root| root.oid.clone()).collect();

        let pdu = Pdu::get_bulk(0, non_repeaters, max_repetitions, &oids);
        let response = self.exchange(pdu).await?;
        check_status(&response)?;

        let reader = self.reader(&*mib);
        let nr = usize::try_from(non_repeaters).unwrap_or(0).min(roots.len());
        let repeaters = roots.len() - nr;
        Ok(read_all(&reader, &roots, &response, |pos| {
            if pos < nr || repeaters == 0 {
                pos
            } else {
                nr + (pos - nr) % repeaters
            }
        }))
    }

    async fn run_walk(
        &mut self,
        specs: &[OidSpec],
        bulk: Option<(i32, i32)>,
    ) -> Result<Vec<Variable>> {
        let mib = Arc::clone(&self.mib);

        let mut roots = Vec::with_capacity(specs.len());
        let mut last_failure = None;
        for spec in specs {
            match request::resolve_one(&*mib, spec, self.config.strategy) {
                Ok(root) => roots.push(root),
                Err(err) => {
                    tracing::warn!(
                        target: "async_snmp_session::walk",
                        { snmp.tag = %spec },
                        "skipping unresolved walk root"
                    );
                    self.error.record(&err);
                    last_failure = Some(err);
                }
            }
        }
        if roots.is_empty()
            && let Some(err) = last_failure
        {
            return Err(err);
        }

        let reader = self.reader(&*mib);
        let mut results = Vec::new();
        for root in &roots {
            self.walk_root(&reader, root, bulk, &mut results).await?;
        }
        Ok(results)
    }

    async fn walk_root(
        &mut self,
        reader: &Reader<'_, dyn MibTree>,
        root: &ResolvedRoot,
        bulk: Option<(i32, i32)>,
        out: &mut Vec<Variable>,
    ) -> Result<()> {
        let mut walk = RootWalk::new(root);
        let start = out.len();

        while let Some(oid) = walk.next_oid() {
            let oids = [oid.clone()];
            let pdu = match bulk {
                Some((non_repeaters, max_repetitions)) => {
                    Pdu::get_bulk(0, non_repeaters, max_repetitions, &oids)
                }
                None => Pdu::get_next_request(0, &oids),
            };
            let response = self.exchange(pdu).await?;

            match response.error_status_enum() {
                ErrorStatus::NoError => walk.scan(reader, &response.varbinds, out)?,
                // v1 agents report the end of the MIB this way
                ErrorStatus::NoSuchName => walk.finish(),
                status => return Err(status_error(status, response.error_index)),
            }
        }

        tracing::debug!(
            target: "async_snmp_session::walk",
            { snmp.root = %root.oid, snmp.varbind_count = out.len() - start },
            "root exhausted"
        );
        Ok(())
    }

    async fn run_set(&mut self, items: &[SetItem]) -> Result<()> {
        let mib = Arc::clone(&self.mib);
        let varbinds = request::build_set(&*mib, items, self.config.strategy)?;

        let response = self.exchange(Pdu::set_request(0, varbinds)).await?;
        check_status(&response)
    }
}

fn collect_specs<I>(specs: I) -> Vec<OidSpec>
where
    I: IntoIterator,
    I::Item: Into<OidSpec>,
{
    specs.into_iter().map(Into::into).collect()
}

/// Read every varbind of a single-exchange response. `root_of` maps a
/// response position to the root it answers.
fn read_all(
    reader: &Reader<'_, dyn MibTree>,
    roots: &[ResolvedRoot],
    response: &Pdu,
    root_of: impl Fn(usize) -> usize,
) -> Vec<Variable> {
    let mut results = Vec::with_capacity(response.varbinds.len());
    for (pos, vb) in response.varbinds.iter().enumerate() {
        let Some(root) = roots.get(root_of(pos)) else {
            continue;
        };
        match walk::classify(reader, root, vb, false) {
            Step::Value(var) | Step::Exception(var) => results.push(var),
            Step::End => {}
        }
    }
    results
}

fn check_status(response: &Pdu) -> Result<()> {
    match response.error_status_enum() {
        ErrorStatus::NoError => Ok(()),
        status => Err(status_error(status, response.error_index)),
    }
}

fn status_error(status: ErrorStatus, index: i32) -> Error {
    let index = u32::try_from(index).unwrap_or(0);
    match status {
        ErrorStatus::NoSuchName => Error::NoSuchName { index },
        status => Error::Snmp { status, index },
    }
}

/// Map an engine failure, normalizing anything that reads as a timeout.
///
/// SNMPv3 engines report an unanswered exchange as a generic failure, so
/// every v3 failure is treated as a timeout.
fn engine_error(err: EngineError, version: Version) -> Error {
    match err {
        EngineError::Timeout => Error::Timeout {
            message: "Timeout".to_string(),
        },
        EngineError::Failed { message, .. }
            if version == Version::V3 || message.to_ascii_lowercase().contains("timeout") =>
        {
            Error::Timeout { message }
        }
        EngineError::Failed { message, code } => Error::Engine { message, code },
        EngineError::Closed => Error::Connection {
            message: EngineError::Closed.to_string(),
        },
    }
}
