//! Sharded record storage
//!
//! DashMap keyed by RecordId. Reads take a shard read guard, writes take
//! the write guard of the one shard that holds the record.
//!
//! # Design
//!
//! - DashMap: sharded by default, concurrent reads within a shard
//! - FxHasher: fast non-crypto hash for integer identities
//! - Check-and-apply: version comparison and payload replacement happen
//!   under the same shard write guard
//!
//! # Thread Safety
//!
//! All operations are thread-safe:
//! - get(): shard read guard, clones the snapshot out
//! - write_if_version_matches(): shard write guard for the whole
//!   check-and-apply, so two writes with the same expected version are
//!   serialized and the second sees the bumped version
//! - Records in different shards never contend

use crate::stats::StoreStats;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rowguard_core::{
    Conflict, Error, Record, RecordId, RecordStore, Result, Snapshot, StoreMetrics, Version,
};
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use tracing::{debug, trace};

type FxBuild = BuildHasherDefault<FxHasher>;

/// Sharded storage - DashMap by RecordId
///
/// # Example
///
/// ```
/// use rowguard_core::{RecordId, RecordStore, Version};
/// use rowguard_storage::ShardedStore;
///
/// let store = ShardedStore::new();
/// let id = RecordId::new(1);
/// store.insert(id, 10u32).unwrap();
///
/// let v1 = store.write_if_version_matches(id, 20, Version::INITIAL).unwrap();
/// assert_eq!(v1, Version::new(1));
/// assert!(store.write_if_version_matches(id, 30, Version::INITIAL).is_err());
/// ```
pub struct ShardedStore<P> {
    records: DashMap<RecordId, Record<P>, FxBuild>,
    stats: StoreStats,
}

impl<P> ShardedStore<P> {
    /// Create new sharded store
    pub fn new() -> Self {
        Self {
            records: DashMap::with_hasher(FxBuild::default()),
            stats: StoreStats::new(),
        }
    }

    /// Create with expected number of records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity_and_hasher(capacity, FxBuild::default()),
            stats: StoreStats::new(),
        }
    }

    /// Get the write counters
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }
}

impl<P> Default for ShardedStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> RecordStore<P> for ShardedStore<P>
where
    P: Clone + Send + Sync,
{
    fn get(&self, id: RecordId) -> Result<Snapshot<P>, P> {
        self.records
            .get(&id)
            .map(|record| record.snapshot())
            .ok_or(Error::NotFound(id))
    }

    fn write_if_version_matches(
        &self,
        id: RecordId,
        payload: P,
        expected: Version,
    ) -> Result<Version, P> {
        // The guard is held from the comparison through the apply.
        let mut record = self.records.get_mut(&id).ok_or(Error::NotFound(id))?;

        if record.version != expected {
            let current = record.snapshot();
            drop(record);
            self.stats.record_rejected();
            debug!(
                record_id = %id,
                expected = %expected,
                actual = %current.version,
                "Rejected write with stale version"
            );
            return Err(Conflict::new(id, expected, current).into());
        }

        let version = record.apply(payload);
        drop(record);
        self.stats.record_applied();
        trace!(record_id = %id, version = %version, "Applied write");
        Ok(version)
    }

    fn insert(&self, id: RecordId, payload: P) -> Result<Version, P> {
        match self.records.entry(id) {
            Entry::Occupied(_) => Err(Error::AlreadyExists(id)),
            Entry::Vacant(slot) => {
                slot.insert(Record::new(id, payload));
                trace!(record_id = %id, "Seeded record");
                Ok(Version::INITIAL)
            }
        }
    }

    fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn metrics(&self) -> StoreMetrics {
        self.stats.metrics()
    }
}
