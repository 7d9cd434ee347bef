//! Public types for the rowguard API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// Identity and version
pub use rowguard_core::RecordId;
pub use rowguard_core::Version;

// Records
pub use rowguard_core::Record;
pub use rowguard_core::Snapshot;

// Storage contract
pub use rowguard_core::RecordStore;
pub use rowguard_core::StoreMetrics;

// Writer types
pub use rowguard_concurrency::{
    Attempt, Committed, ConflictPolicy, RefreshMode, WriterConfig, WriterMetrics,
    DEFAULT_RETRY_BUDGET,
};

// Backends, for callers wiring their own database
pub use rowguard_storage::{LockedStore, ShardedStore};
