//! Core types for rowguard
//!
//! This crate defines the vocabulary shared by stores and writers:
//! - RecordId / Version: identity and concurrency token
//! - Record / Snapshot: stored record and reader's copy
//! - Error / Conflict: the error taxonomy
//! - RecordStore: the version-checked storage contract

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod record;
pub mod traits;
pub mod types;

pub use error::{BoxError, Conflict, Error, Result, StorageError};
pub use record::{Record, Snapshot};
pub use traits::{RecordStore, StoreMetrics};
pub use types::{RecordId, Version};
