//! Main entry point for rowguard.
//!
//! This module provides the `Rowguard` struct, which pairs a record store
//! with a writer, and the builder used to configure both.

use crate::error::Result;
use crate::types::{
    Attempt, Committed, ConflictPolicy, RecordId, RecordStore, RefreshMode, Snapshot, Version,
    WriterConfig, WriterMetrics,
};
use rowguard_concurrency::Writer;
use rowguard_storage::{LockedStore, ShardedStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// DashMap, per-shard locking (default)
    #[default]
    Sharded,
    /// Single RwLock around a hash map
    Locked,
}

/// Full configuration, loadable from any serde format.
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage backend
    pub backend: Backend,
    /// Writer settings
    pub writer: WriterConfig,
}

/// A versioned record database.
///
/// Create one with [`Rowguard::ephemeral`] or [`Rowguard::builder`]. All
/// methods take `&self`; share the database across threads with `Arc`.
///
/// # Example
///
/// ```
/// use rowguard::prelude::*;
///
/// let db: Rowguard<i64> = Rowguard::ephemeral();
/// let id = RecordId::new(1);
/// db.insert(id, 10)?;
///
/// let committed = db.update(id, ConflictPolicy::RetryOnce, |qty| qty + 1)?;
/// assert_eq!(committed.payload, 11);
/// assert_eq!(db.get(id)?.version, Version::new(1));
/// # Ok::<(), rowguard::Error<i64>>(())
/// ```
pub struct Rowguard<P: 'static> {
    store: Arc<dyn RecordStore<P>>,
    writer: Writer<dyn RecordStore<P>>,
    backend: Option<Backend>,
}

impl<P> Rowguard<P>
where
    P: Clone + Send + Sync + 'static,
{
    /// Create an in-memory database with default settings.
    pub fn ephemeral() -> Self {
        Self::builder().open()
    }

    /// Create a builder for database configuration.
    ///
    /// Equivalent to [`RowguardBuilder::new`].
    pub fn builder() -> RowguardBuilder {
        RowguardBuilder::new()
    }

    /// Use a caller-provided store.
    ///
    /// Any backend honoring the [`RecordStore`] contract works, including
    /// adapters over durable storage.
    pub fn with_store(store: Arc<dyn RecordStore<P>>, config: WriterConfig) -> Self {
        Self::from_parts(store, config, None)
    }

    fn from_parts(
        store: Arc<dyn RecordStore<P>>,
        config: WriterConfig,
        backend: Option<Backend>,
    ) -> Self {
        Self {
            writer: Writer::with_config(Arc::clone(&store), config),
            store,
            backend,
        }
    }

    // =========================================================================
    // Store operations
    // =========================================================================

    /// Seed a record at version 0.
    pub fn insert(&self, id: RecordId, payload: P) -> Result<Version, P> {
        self.store.insert(id, payload)
    }

    /// Read the current payload and version.
    ///
    /// Fails with `NotFound` for an unknown identity.
    pub fn get(&self, id: RecordId) -> Result<Snapshot<P>, P> {
        self.store.get(id)
    }

    /// Write `payload` only if the record is still at `expected`.
    pub fn write_if_version_matches(
        &self,
        id: RecordId,
        payload: P,
        expected: Version,
    ) -> Result<Version, P> {
        self.store.write_if_version_matches(id, payload, expected)
    }

    /// Check if a record exists.
    pub fn contains(&self, id: RecordId) -> bool {
        self.store.contains(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if there are no records.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // =========================================================================
    // Writer operations
    // =========================================================================

    /// Read-modify-write with conflict handling per `policy`.
    pub fn update<F>(
        &self,
        id: RecordId,
        policy: ConflictPolicy,
        rule: F,
    ) -> Result<Committed<P>, P>
    where
        F: FnMut(&P) -> P,
    {
        self.writer.update(id, policy, rule)
    }

    /// Read-modify-write where `rule` may reject the current payload.
    ///
    /// See [`Writer::try_update`].
    pub fn try_update<F>(
        &self,
        id: RecordId,
        policy: ConflictPolicy,
        rule: F,
    ) -> Result<Committed<P>, P>
    where
        F: FnMut(&P) -> Result<P, P>,
    {
        self.writer.try_update(id, policy, rule)
    }

    /// Read now, commit later.
    ///
    /// See [`Attempt::commit`].
    pub fn begin(
        &self,
        id: RecordId,
    ) -> Result<Attempt<'_, dyn RecordStore<P>, P>, P> {
        self.writer.begin(id)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Built-in backend in use, `None` for a caller-provided store.
    pub fn backend(&self) -> Option<Backend> {
        self.backend
    }

    /// Writer configuration in use.
    pub fn writer_config(&self) -> &WriterConfig {
        self.writer.config()
    }

    /// Get database metrics.
    pub fn metrics(&self) -> DatabaseMetrics {
        let store = self.store.metrics();
        let WriterMetrics {
            commits,
            conflicts,
            retries,
            surfaced_conflicts,
        } = self.writer.metrics();
        DatabaseMetrics {
            records: self.store.len(),
            writes_applied: store.writes_applied,
            writes_rejected: store.writes_rejected,
            commits,
            conflicts,
            retries,
            surfaced_conflicts,
        }
    }
}

/// Database metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseMetrics {
    /// Records held
    pub records: usize,
    /// Version-checked writes applied by the store
    pub writes_applied: u64,
    /// Version-checked writes rejected by the store
    pub writes_rejected: u64,
    /// Updates committed through the writer
    pub commits: u64,
    /// Conflicts the writer observed
    pub conflicts: u64,
    /// Retries the writer performed
    pub retries: u64,
    /// Conflicts the writer handed back to callers
    pub surfaced_conflicts: u64,
}

/// Builder for database configuration.
///
/// # Example
///
/// ```
/// use rowguard::prelude::*;
///
/// let db: Rowguard<String> = RowguardBuilder::new()
///     .locked()
///     .retry_budget(5)
///     .refresh_from_conflict()
///     .open();
/// assert_eq!(db.backend(), Some(Backend::Locked));
/// assert_eq!(db.writer_config().retry_budget, 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RowguardBuilder {
    config: Config,
}

impl RowguardBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Choose the backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Use the sharded backend (default).
    pub fn sharded(self) -> Self {
        self.backend(Backend::Sharded)
    }

    /// Use the single-lock backend.
    pub fn locked(self) -> Self {
        self.backend(Backend::Locked)
    }

    /// Retries granted by `ConflictPolicy::Default`.
    pub fn retry_budget(mut self, budget: u32) -> Self {
        self.config.writer.retry_budget = budget;
        self
    }

    /// Refresh from the conflict's snapshot instead of re-reading.
    pub fn refresh_from_conflict(mut self) -> Self {
        self.config.writer.refresh = RefreshMode::FromConflict;
        self
    }

    /// The configuration assembled so far.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open the database.
    pub fn open<P>(self) -> Rowguard<P>
    where
        P: Clone + Send + Sync + 'static,
    {
        let store: Arc<dyn RecordStore<P>> = match self.config.backend {
            Backend::Sharded => Arc::new(ShardedStore::<P>::new()),
            Backend::Locked => Arc::new(LockedStore::<P>::new()),
        };
        tracing::debug!(
            backend = ?self.config.backend,
            retry_budget = self.config.writer.retry_budget,
            "Opened database"
        );
        Rowguard::from_parts(store, self.config.writer, Some(self.config.backend))
    }
}
