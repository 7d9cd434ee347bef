//! Single-lock record storage
//!
//! One `parking_lot::RwLock` around an FxHashMap. Every write serializes on
//! the same lock, which makes the check-and-apply trivially atomic at the
//! cost of cross-record contention. Useful as a reference backend and for
//! small record sets.

use crate::stats::StoreStats;
use parking_lot::RwLock;
use rowguard_core::{
    Conflict, Error, Record, RecordId, RecordStore, Result, Snapshot, StoreMetrics, Version,
};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, trace};

/// RwLock-guarded record storage
pub struct LockedStore<P> {
    records: RwLock<FxHashMap<RecordId, Record<P>>>,
    stats: StoreStats,
}

impl<P> LockedStore<P> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(FxHashMap::default()),
            stats: StoreStats::new(),
        }
    }

    /// Get the write counters
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }
}

impl<P> Default for LockedStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> RecordStore<P> for LockedStore<P>
where
    P: Clone + Send + Sync,
{
    fn get(&self, id: RecordId) -> Result<Snapshot<P>, P> {
        self.records
            .read()
            .get(&id)
            .map(Record::snapshot)
            .ok_or(Error::NotFound(id))
    }

    fn write_if_version_matches(
        &self,
        id: RecordId,
        payload: P,
        expected: Version,
    ) -> Result<Version, P> {
        let mut records = self.records.write();
        let record = records.get_mut(&id).ok_or(Error::NotFound(id))?;

        if record.version != expected {
            let current = record.snapshot();
            drop(records);
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
        drop(records);
        self.stats.record_applied();
        trace!(record_id = %id, version = %version, "Applied write");
        Ok(version)
    }

    fn insert(&self, id: RecordId, payload: P) -> Result<Version, P> {
        match self.records.write().entry(id) {
            Entry::Occupied(_) => Err(Error::AlreadyExists(id)),
            Entry::Vacant(slot) => {
                slot.insert(Record::new(id, payload));
                trace!(record_id = %id, "Seeded record");
                Ok(Version::INITIAL)
            }
        }
    }

    fn contains(&self, id: RecordId) -> bool {
        self.records.read().contains_key(&id)
    }

    fn len(&self) -> usize {
        self.records.read().len()
    }

    fn metrics(&self) -> StoreMetrics {
        self.stats.metrics()
    }
}
