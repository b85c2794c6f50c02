//! A session shared between tasks.

use super::{Session, SessionConfig};
use crate::engine::Engine;
use crate::error::{ErrorState, Result};
use crate::label::OidSpec;
use crate::request::SetItem;
use crate::variable::Variable;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cloneable handle to one [`Session`].
///
/// Operations queue on an async mutex and run one at a time, so options
/// and error state never mix between concurrent callers. The error state
/// returned alongside each result is the one that operation left behind.
pub struct SharedSession<E> {
    inner: Arc<Mutex<Session<E>>>,
}

impl<E> Clone for SharedSession<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Engine> From<Session<E>> for SharedSession<E> {
    fn from(session: Session<E>) -> Self {
        Self::new(session)
    }
}

impl<E: Engine> SharedSession<E> {
    pub fn new(session: Session<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Snapshot of the options.
    pub async fn config(&self) -> SessionConfig {
        self.inner.lock().await.config().clone()
    }

    /// Change options for subsequent operations.
    pub async fn update_config(&self, update: impl FnOnce(&mut SessionConfig)) {
        update(self.inner.lock().await.config_mut());
    }

    /// Error recorded by the most recent operation of any holder.
    pub async fn last_error(&self) -> ErrorState {
        self.inner.lock().await.last_error().clone()
    }

    pub async fn get<I>(&self, specs: I) -> Result<Vec<Variable>>
    where
        I: IntoIterator,
        I::Item: Into<OidSpec>,
    {
        self.inner.lock().await.get(specs).await
    }

    pub async fn get_next<I>(&self, specs: I) -> Result<Vec<Variable>>
    where
        I: IntoIterator,
        I::Item: Into<OidSpec>,
    {
        self.inner.lock().await.get_next(specs).await
    }

    pub async fn get_bulk<I>(
        &self,
        specs: I,
        non_repeaters: i32,
        max_repetitions: i32,
    ) -> Result<Vec<Variable>>
    where
        I: IntoIterator,
        I::Item: Into<OidSpec>,
    {
        self.inner
            .lock()
            .await
            .get_bulk(specs, non_repeaters, max_repetitions)
            .await
    }

    pub async fn walk<I>(&self, specs: I) -> Result<Vec<Variable>>
    where
        I: IntoIterator,
        I::Item: Into<OidSpec>,
    {
        self.inner.lock().await.walk(specs).await
    }

    pub async fn bulk_walk<I>(
        &self,
        specs: I,
        non_repeaters: i32,
        max_repetitions: i32,
    ) -> Result<Vec<Variable>>
    where
        I: IntoIterator,
        I::Item: Into<OidSpec>,
    {
        self.inner
            .lock()
            .await
            .bulk_walk(specs, non_repeaters, max_repetitions)
            .await
    }

    pub async fn set<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<SetItem>,
    {
        self.inner.lock().await.set(items).await
    }
}
