//! Concurrency-aware writer
//!
//! Performs read-modify-write updates against a [`RecordStore`] and
//! resolves version conflicts according to a [`ConflictPolicy`].
//!
//! ## Attempt Sequence
//!
//! ```text
//! 1. Read     - get (payload, version) from the store
//! 2. Compute  - apply the update rule to the payload
//! 3. Write    - write_if_version_matches(id, new payload, version)
//! 4. IF applied: return Committed
//! 5. IF conflict and budget left: refresh snapshot, go to 2
//! 6. IF conflict and budget spent: return the conflict (latest snapshot)
//! 7. Any other error: return it unchanged
//! ```
//!
//! The update rule may run once per attempt, always against the freshest
//! payload the writer has seen. It must not assume it runs exactly once.

use crate::policy::{ConflictPolicy, RefreshMode, WriterConfig};
use rowguard_core::{Error, RecordId, RecordStore, Result, Snapshot, Version};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Result of a successful update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<P> {
    /// Record that was written
    pub id: RecordId,
    /// Version assigned by the store
    pub version: Version,
    /// Payload that was written
    pub payload: P,
    /// Attempts taken, including the successful one
    pub attempts: u32,
}

/// Writer counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterMetrics {
    /// Updates that were applied
    pub commits: u64,
    /// Conflicts observed, retried or not
    pub conflicts: u64,
    /// Retries performed after a conflict
    pub retries: u64,
    /// Updates that gave up with a conflict
    pub surfaced_conflicts: u64,
}

#[derive(Debug, Default)]
struct WriterStats {
    commits: AtomicU64,
    conflicts: AtomicU64,
    retries: AtomicU64,
    surfaced_conflicts: AtomicU64,
}

impl WriterStats {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn metrics(&self) -> WriterMetrics {
        WriterMetrics {
            commits: self.commits.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            surfaced_conflicts: self.surfaced_conflicts.load(Ordering::Relaxed),
        }
    }
}

/// Performs version-checked updates against a shared store
///
/// A writer is cheap to share: wrap it in an `Arc` and call it from any
/// number of threads. Each call is self-contained; abandoning one midway
/// leaves nothing to clean up.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rowguard_concurrency::{ConflictPolicy, Writer};
/// use rowguard_core::{RecordId, RecordStore};
/// use rowguard_storage::ShardedStore;
///
/// let store = Arc::new(ShardedStore::new());
/// let id = RecordId::new(1);
/// store.insert(id, 10u32).unwrap();
///
/// let writer = Writer::new(store);
/// let committed = writer.update(id, ConflictPolicy::FailFast, |qty| qty + 5).unwrap();
/// assert_eq!(committed.payload, 15);
/// assert_eq!(committed.version.as_u64(), 1);
/// ```
pub struct Writer<S: ?Sized> {
    store: Arc<S>,
    config: WriterConfig,
    stats: WriterStats,
}

impl<S: ?Sized> Writer<S> {
    /// Create a writer with the default configuration
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, WriterConfig::default())
    }

    /// Create a writer with an explicit configuration
    pub fn with_config(store: Arc<S>, config: WriterConfig) -> Self {
        Self {
            store,
            config,
            stats: WriterStats::default(),
        }
    }

    /// The configuration in effect
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Get writer counters
    pub fn metrics(&self) -> WriterMetrics {
        self.stats.metrics()
    }

    /// Read a record and hold its snapshot for a later commit
    ///
    /// This is the first half of [`Writer::update`]. The returned
    /// [`Attempt`] remembers the version that was read; committing it
    /// fails (or retries) if anyone else writes in between.
    pub fn begin<P>(&self, id: RecordId) -> Result<Attempt<'_, S, P>, P>
    where
        S: RecordStore<P>,
        P: Clone,
    {
        let snapshot = self.store.get(id)?;
        Ok(Attempt {
            writer: self,
            id,
            snapshot,
        })
    }

    /// Read, apply `rule`, and write back under `policy`
    ///
    /// # Errors
    ///
    /// - `NotFound` if the record does not exist
    /// - `Conflict` if the policy's retry budget is spent
    /// - `Storage` from the backend, unchanged
    pub fn update<P, F>(
        &self,
        id: RecordId,
        policy: ConflictPolicy,
        rule: F,
    ) -> Result<Committed<P>, P>
    where
        S: RecordStore<P>,
        P: Clone,
        F: FnMut(&P) -> P,
    {
        self.begin(id)?.commit(policy, rule)
    }

    /// Like [`Writer::update`], but `rule` may refuse the current payload
    ///
    /// An `Err` from `rule` is returned as-is and nothing is written.
    pub fn try_update<P, F>(
        &self,
        id: RecordId,
        policy: ConflictPolicy,
        rule: F,
    ) -> Result<Committed<P>, P>
    where
        S: RecordStore<P>,
        P: Clone,
        F: FnMut(&P) -> Result<P, P>,
    {
        self.begin(id)?.try_commit(policy, rule)
    }
}

fn attempts(retries: u32) -> u32 {
    retries.saturating_add(1)
}

/// A read whose write has not happened yet
///
/// Holds the snapshot taken by [`Writer::begin`].
pub struct Attempt<'w, S: ?Sized, P> {
    writer: &'w Writer<S>,
    id: RecordId,
    snapshot: Snapshot<P>,
}

impl<'w, S, P> Attempt<'w, S, P>
where
    S: RecordStore<P> + ?Sized,
    P: Clone,
{
    /// Record this attempt targets
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// The state that was read
    pub fn snapshot(&self) -> &Snapshot<P> {
        &self.snapshot
    }

    /// Apply `rule` to the held snapshot and write it back under `policy`
    ///
    /// On a conflict with budget left, the snapshot is refreshed (per
    /// [`RefreshMode`]) and `rule` is applied again to the fresh payload.
    pub fn commit<F>(self, policy: ConflictPolicy, mut rule: F) -> Result<Committed<P>, P>
    where
        F: FnMut(&P) -> P,
    {
        self.try_commit(policy, |payload| Ok(rule(payload)))
    }

    /// Fallible form of [`Attempt::commit`]
    ///
    /// If `rule` returns an error, the loop stops there without writing.
    pub fn try_commit<F>(self, policy: ConflictPolicy, mut rule: F) -> Result<Committed<P>, P>
    where
        F: FnMut(&P) -> Result<P, P>,
    {
        let writer = self.writer;
        let id = self.id;
        let budget = policy.retry_budget(&writer.config);
        let mut snapshot = self.snapshot;
        let mut retries = 0u32;

        loop {
            // Compute
            let payload = rule(&snapshot.payload)?;

            // Write
            let written = writer
                .store
                .write_if_version_matches(id, payload.clone(), snapshot.version);
            let conflict = match written {
                Ok(version) => {
                    WriterStats::bump(&writer.stats.commits);
                    trace!(record_id = %id, version = %version, attempts = attempts(retries), "Committed update");
                    return Ok(Committed {
                        id,
                        version,
                        payload,
                        attempts: attempts(retries),
                    });
                }
                Err(Error::Conflict(conflict)) => conflict,
                Err(e) => return Err(e),
            };

            WriterStats::bump(&writer.stats.conflicts);

            if retries >= budget {
                WriterStats::bump(&writer.stats.surfaced_conflicts);
                if budget > 0 {
                    warn!(
                        record_id = %id,
                        retries,
                        actual = %conflict.actual(),
                        "Retry budget exhausted, surfacing conflict"
                    );
                } else {
                    debug!(record_id = %id, actual = %conflict.actual(), "Surfacing conflict");
                }
                return Err(conflict.into());
            }

            retries += 1;
            WriterStats::bump(&writer.stats.retries);
            debug!(
                record_id = %id,
                expected = %conflict.expected,
                actual = %conflict.actual(),
                retry = retries,
                "Version conflict, retrying with fresh state"
            );

            // Read
            snapshot = match writer.config.refresh {
                RefreshMode::Reread => writer.store.get(id)?,
                RefreshMode::FromConflict => conflict.current,
            };
        }
    }
}
