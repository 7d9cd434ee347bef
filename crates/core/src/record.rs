//! Record types
//!
//! These types define the structure of versioned records and the snapshots
//! handed out to readers.

use crate::types::{RecordId, Version};
use serde::{Deserialize, Serialize};

/// A versioned record as held by a store
///
/// Each record has:
/// - A stable identity
/// - A payload (the mutable business fields)
/// - A version number (advanced only by the store)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record<P> {
    /// Identity of the record
    pub id: RecordId,
    /// Current payload
    pub payload: P,
    /// Number of writes applied since creation
    pub version: Version,
}

impl<P> Record<P> {
    /// Create a record at [`Version::INITIAL`]
    pub fn new(id: RecordId, payload: P) -> Self {
        Self {
            id,
            payload,
            version: Version::INITIAL,
        }
    }

    /// Replace the payload and advance the version by one
    ///
    /// Returns the new version. Stores call this while holding the lock
    /// that guards the version check, so payload and version change
    /// together.
    pub fn apply(&mut self, payload: P) -> Version {
        self.payload = payload;
        self.version = self.version.next();
        self.version
    }
}

impl<P: Clone> Record<P> {
    /// Copy out the `(payload, version)` pair
    pub fn snapshot(&self) -> Snapshot<P> {
        Snapshot {
            payload: self.payload.clone(),
            version: self.version,
        }
    }
}

/// Point-in-time view of a record
///
/// A reader's copy. It is never written back to the store as-is; its
/// `version` is what a writer supplies as the expected version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot<P> {
    /// Payload at the time of the read
    pub payload: P,
    /// Version at the time of the read
    pub version: Version,
}

impl<P> Snapshot<P> {
    /// Create a snapshot
    pub fn new(payload: P, version: Version) -> Self {
        Self { payload, version }
    }
}
