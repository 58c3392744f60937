//! Wrappers around the host's deserializer and name lookup.
//!
//! A [`LoadSession`] owns the pending slot for one loading pass and hands out
//! a [`ParseIntercept`] and an [`IdentityIntercept`] that share it. The parse
//! side fills the slot when it sees the marker; the next lookup through the
//! identity side binds the batch under the looked-up name. Both wrappers
//! return the host's results unchanged.
//!
//! Run one session per loading thread. Sessions can share a [`FieldStore`].

use crate::capture::{CapturedBatch, ModScope, PendingCapture, marker_fields};
use crate::config::CaptureOptions;
use crate::host::{ContentDeserializer, ContentLookup, LoadContext};
use crate::store::FieldStore;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Clone)]
/// Shared state for one loading pass.
pub struct LoadSession {
    pending: Arc<Mutex<PendingCapture>>,
    store: Arc<FieldStore>,
    options: Arc<CaptureOptions>,
}

impl LoadSession {
    /// Start a session writing into `store`. Invalid options are rejected
    /// here so a misconfigured host fails before any file is parsed.
    pub fn new(store: Arc<FieldStore>, options: CaptureOptions) -> Result<Self> {
        options
            .validate()
            .context("invalid capture options for load session")?;
        Ok(Self {
            pending: Arc::new(Mutex::new(PendingCapture::default())),
            store,
            options: Arc::new(options),
        })
    }

    pub fn store(&self) -> &Arc<FieldStore> {
        &self.store
    }

    /// Wrap the host deserializer. `context` is consulted only when a marker
    /// is present.
    pub fn parse_intercept<C, D>(&self, context: C, inner: D) -> ParseIntercept<C, D>
    where
        C: LoadContext,
        D: ContentDeserializer,
    {
        ParseIntercept {
            session: self.clone(),
            context,
            inner,
        }
    }

    /// Wrap the host lookup.
    pub fn identity_intercept<L>(&self, inner: L) -> IdentityIntercept<L>
    where
        L: ContentLookup,
    {
        IdentityIntercept {
            session: self.clone(),
            inner,
        }
    }

    /// True while a captured batch is waiting for a lookup.
    pub fn has_pending(&self) -> bool {
        self.slot().is_pending()
    }

    /// Drop any batch that was never bound.
    pub fn discard_pending(&self) {
        if let Some(stale) = self.slot().take() {
            debug!(scope = %stale.scope, fields = stale.fields.len(), "Discarded unbound capture");
        }
    }

    fn slot(&self) -> MutexGuard<'_, PendingCapture> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Drop-in replacement for the host deserializer.
pub struct ParseIntercept<C, D> {
    session: LoadSession,
    context: C,
    inner: D,
}

impl<C, D> ParseIntercept<C, D>
where
    C: LoadContext,
    D: ContentDeserializer,
{
    fn capture(&self, node: &Value) -> Result<()> {
        let Some(fields) = marker_fields(node, &self.session.options.marker_field) else {
            return Ok(());
        };

        let scope = self
            .context
            .current_scope()
            .context("reading active mod scope while capturing custom fields")?;
        if scope.is_empty() {
            bail!("host load context returned an empty mod scope");
        }

        let batch = CapturedBatch {
            scope: ModScope(scope),
            fields,
        };
        debug!(scope = %batch.scope, fields = batch.fields.len(), "Captured custom fields");
        if let Some(stale) = self.session.slot().set(batch) {
            debug!(scope = %stale.scope, fields = stale.fields.len(), "Replaced unbound capture");
        }
        Ok(())
    }
}

impl<C, D> ContentDeserializer for ParseIntercept<C, D>
where
    C: LoadContext,
    D: ContentDeserializer,
{
    type Output = D::Output;

    fn deserialize(&self, node: &Value) -> Result<D::Output> {
        self.capture(node)?;
        self.inner.deserialize(node)
    }
}

/// Drop-in replacement for the host lookup.
pub struct IdentityIntercept<L> {
    session: LoadSession,
    inner: L,
}

impl<L> ContentLookup for IdentityIntercept<L>
where
    L: ContentLookup,
{
    type Entity = L::Entity;

    fn lookup(&self, name: &str) -> Option<L::Entity> {
        let found = self.inner.lookup(name);
        // Take the batch before binding so the slot lock is not held across
        // the store write.
        let pending = self.session.slot().take();
        if let Some(batch) = pending {
            self.session.store.bind(batch, name);
        }
        found
    }
}
