//! Core types for versioned records
//!
//! This module defines the identity and version types used throughout the system:
//! - [`RecordId`]: Stable identity of a record within a store
//! - [`Version`]: Generation counter owned by the store

use serde::{Deserialize, Serialize};

/// Stable identity of a record
///
/// Assigned when the record is seeded and immutable thereafter. Unique
/// within a single store.
///
/// # Examples
///
/// ```
/// use rowguard_core::types::RecordId;
///
/// let id = RecordId::new(1);
/// assert_eq!(id.as_u64(), 1);
/// assert_eq!(id, RecordId::from(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    /// Create a RecordId from its raw value
    pub const fn new(raw: u64) -> Self {
        RecordId(raw)
    }

    /// Get the raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        RecordId(raw)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Concurrency token of a record
///
/// A generation counter: starts at [`Version::INITIAL`] when the record is
/// created and is advanced by exactly one by the store for every applied
/// write. Callers never construct a "next" version themselves; they only
/// read a version and hand it back as the expected value of a write.
///
/// # Examples
///
/// ```
/// use rowguard_core::types::Version;
///
/// let v = Version::INITIAL;
/// assert_eq!(v.as_u64(), 0);
/// assert!(v.next() > v);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version(u64);

impl Version {
    /// Version of a freshly created record
    pub const INITIAL: Version = Version(0);

    /// Create a version from a raw counter
    ///
    /// Used by callers that persisted a version and want to present it
    /// back as an expected value.
    pub const fn new(counter: u64) -> Self {
        Version(counter)
    }

    /// Get the raw counter
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The generation that follows this one
    ///
    /// Only stores call this, as part of applying a write.
    #[must_use]
    pub const fn next(&self) -> Self {
        Version(self.0 + 1)
    }
}

impl From<u64> for Version {
    fn from(counter: u64) -> Self {
        Version(counter)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}
