//! Error types for record stores and writers
//!
//! The taxonomy is deliberately small:
//!
//! | Variant | Meaning | Retried by writers |
//! |---------|---------|--------------------|
//! | NotFound | Identity has no record | Never |
//! | AlreadyExists | Seeding an identity that is taken | Never |
//! | Conflict | Expected version did not match at apply time | Per policy |
//! | Rejected | The update rule declined the current payload | Never |
//! | Storage | Backend failure, opaque to this layer | Never |
//!
//! A [`Conflict`] carries the record's current snapshot so that a caller can
//! resolve it without issuing another read.

use crate::record::Snapshot;
use crate::types::{RecordId, Version};
use thiserror::Error;

/// Boxed error used to carry a backend's own failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for record operations over payload `P`.
pub type Result<T, P> = std::result::Result<T, Error<P>>;

/// All record store errors.
#[derive(Debug, Error)]
pub enum Error<P> {
    /// No record with this identity
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// A record with this identity was already seeded
    #[error("record already exists: {0}")]
    AlreadyExists(RecordId),

    /// Version check failed; nothing was written
    #[error("{0}")]
    Conflict(Conflict<P>),

    /// The update rule refused to produce a new payload; nothing was written
    #[error("update rejected on record {id}: {reason}")]
    Rejected {
        /// Record the update targeted
        id: RecordId,
        /// Why the rule refused
        reason: String,
    },

    /// Backend failure, passed through unchanged
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl<P> Error<P> {
    /// Check if this error is retryable.
    ///
    /// Only conflicts may succeed on retry with fresh data.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    /// Check if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if the update rule rejected the change.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Error::Rejected { .. })
    }

    /// Borrow the conflict details, if this is a conflict.
    pub fn conflict(&self) -> Option<&Conflict<P>> {
        match self {
            Error::Conflict(conflict) => Some(conflict),
            _ => None,
        }
    }

    /// Take the conflict details, if this is a conflict.
    pub fn into_conflict(self) -> Option<Conflict<P>> {
        match self {
            Error::Conflict(conflict) => Some(conflict),
            _ => None,
        }
    }
}

impl<P> From<Conflict<P>> for Error<P> {
    fn from(conflict: Conflict<P>) -> Self {
        Error::Conflict(conflict)
    }
}

/// A rejected version-checked write
///
/// `current` is the record as it stood when the write was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("version conflict on record {id}: expected {expected}, found {}", .current.version)]
pub struct Conflict<P> {
    /// Record the write targeted
    pub id: RecordId,
    /// Version the writer expected
    pub expected: Version,
    /// Snapshot at rejection time
    pub current: Snapshot<P>,
}

impl<P> Conflict<P> {
    /// Create a conflict report
    pub fn new(id: RecordId, expected: Version, current: Snapshot<P>) -> Self {
        Self {
            id,
            expected,
            current,
        }
    }

    /// Version the record actually had
    pub fn actual(&self) -> Version {
        self.current.version
    }
}

/// Opaque backend failure
///
/// Never interpreted as a conflict by writers.
#[derive(Debug, Error)]
#[error("storage error: {message}")]
pub struct StorageError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl StorageError {
    /// Create a storage error with a message only
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error wrapping the backend's own error
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::with_source("I/O failure", e)
    }
}
