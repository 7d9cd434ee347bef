//! Convenient imports for rowguard.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```
//! use rowguard::prelude::*;
//!
//! let products = Products::ephemeral();
//! products.seed(1, "Sample Product", 10)?;
//! # Ok::<(), Error<Product>>(())
//! ```

// Main entry point
pub use crate::database::{Backend, Config, Rowguard, RowguardBuilder};

// Error handling
pub use crate::error::{Conflict, Error, Result};

// Primitives
pub use crate::primitives::{Product, Products};

// Core types
pub use crate::types::{Committed, ConflictPolicy, RecordId, RecordStore, Snapshot, Version};
