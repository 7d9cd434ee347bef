//! Records API Comprehensive Tests
//!
//! Exercises the public rowguard API against every storage backend:
//! - basic_ops: seeding, reads, not-found behavior
//! - cas_ops: version-checked writes
//! - conflict_scenarios: the two-clerk interleavings
//! - retry_policy: fail-fast, retry-once and budgeted retries
//! - concurrency: many threads on one record

mod basic_ops;
mod retry_policy;

pub use rowguard::prelude::*;
pub use rowguard::{DatabaseMetrics, RefreshMode};

/// Install a test-friendly subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Every backend the builder can open
pub const ALL_BACKENDS: [Backend; 2] = [Backend::Sharded, Backend::Locked];

/// Fresh product database on the given backend
pub fn create_products(backend: Backend) -> Products {
    init_tracing();
    Products::new(RowguardBuilder::new().backend(backend).open())
}

/// Product database with `{id=1, "Sample Product", qty=10, v0}` seeded
pub fn seeded_products(backend: Backend) -> Products {
    let products = create_products(backend);
    products.seed(1, "Sample Product", 10).unwrap();
    products
}

/// Run a test body once per backend
pub fn test_across_backends<F>(test_fn: F)
where
    F: Fn(Products),
{
    for backend in ALL_BACKENDS {
        test_fn(seeded_products(backend));
    }
}
