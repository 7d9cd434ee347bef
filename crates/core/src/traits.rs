//! The storage contract
//!
//! [`RecordStore`] is the seam between the writer and whatever holds the
//! records. Implementations must make the version check and the apply a
//! single atomic step per identity: of two writes carrying the same
//! expected version, at most one may succeed.

use crate::error::Result;
use crate::record::Snapshot;
use crate::types::{RecordId, Version};

/// A store of versioned records with payload type `P`
///
/// The store owns the authoritative version of every record. The only
/// way to change a record is [`RecordStore::write_if_version_matches`],
/// which advances the version by exactly one on success. There is no
/// unchecked write.
pub trait RecordStore<P>: Send + Sync {
    /// Read the current `(payload, version)` of a record
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`](crate::Error::NotFound) if no record has this identity
    fn get(&self, id: RecordId) -> Result<Snapshot<P>, P>;

    /// Apply `payload` if the record is still at `expected`
    ///
    /// On success the version is advanced by one and returned. On a
    /// mismatch nothing is written and the current snapshot is reported.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`](crate::Error::NotFound) if no record has this identity
    /// - [`Error::Conflict`](crate::Error::Conflict) if the version moved on
    fn write_if_version_matches(&self, id: RecordId, payload: P, expected: Version)
        -> Result<Version, P>;

    /// Create a record at [`Version::INITIAL`]
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyExists`](crate::Error::AlreadyExists) if the identity is taken
    fn insert(&self, id: RecordId, payload: P) -> Result<Version, P>;

    /// Check if a record exists
    fn contains(&self, id: RecordId) -> bool;

    /// Number of records held
    fn len(&self) -> usize;

    /// Check if the store holds no records
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write counters, for backends that keep them
    fn metrics(&self) -> StoreMetrics {
        StoreMetrics::default()
    }
}

/// Counters reported by a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreMetrics {
    /// Version-checked writes that were applied
    pub writes_applied: u64,
    /// Version-checked writes rejected with a conflict
    pub writes_rejected: u64,
}
