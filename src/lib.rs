//! # Rowguard
//!
//! Optimistic concurrency control for versioned records.
//!
//! Every record carries a version that the store advances by exactly one
//! on each applied write. Writers read a record, compute a new payload and
//! write it back together with the version they read. If anyone else wrote
//! in between, the write is rejected with a [`Conflict`] instead of silently
//! overwriting the other change. The writer then either reports the
//! conflict or re-reads and tries again, depending on its
//! [`ConflictPolicy`].
//!
//! ## Quick Start
//!
//! ```
//! use rowguard::prelude::*;
//!
//! let products = Products::ephemeral();
//! products.seed(1, "Sample Product", 10)?;
//!
//! // Two clerks read the same stock level.
//! let late = products.begin(1)?;
//! products.set_stock(1, 20, ConflictPolicy::FailFast)?;
//!
//! // The late write is rejected rather than losing the first one.
//! let err = late
//!     .commit(ConflictPolicy::FailFast, |p| p.with_stock(30))
//!     .unwrap_err();
//! assert!(err.is_conflict());
//! assert_eq!(products.stock(1)?, 20);
//! # Ok::<(), Error<Product>>(())
//! ```
//!
//! ## Layers
//!
//! - `rowguard-core` - identities, versions, errors, the [`RecordStore`] trait
//! - `rowguard-storage` - [`ShardedStore`] and [`LockedStore`]
//! - `rowguard-concurrency` - the writer and its conflict policies
//! - this crate - [`Rowguard`], its builder, and the [`Products`] facade

#![warn(missing_docs)]

mod database;
mod error;
mod primitives;
mod types;

pub mod prelude;

// Re-export main entry points
pub use database::{Backend, Config, DatabaseMetrics, Rowguard, RowguardBuilder};
pub use error::{BoxError, Conflict, Error, Result, StorageError};

// Re-export primitives
pub use primitives::{Product, Products};

// Re-export types
pub use types::*;
