//! Storage layer for rowguard
//!
//! This crate implements the version-checked record stores:
//! - ShardedStore: DashMap-based storage, per-shard locking
//! - LockedStore: FxHashMap behind a single RwLock
//! - StoreStats: applied/rejected write counters
//!
//! Both implement [`rowguard_core::RecordStore`] and advance a record's
//! version by exactly one inside the same critical section that checks it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod locked;
pub mod sharded;
pub mod stats;

pub use locked::LockedStore;
pub use sharded::ShardedStore;
pub use stats::StoreStats;
