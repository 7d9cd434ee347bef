//! Write counters shared by the backends

use rowguard_core::StoreMetrics;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free write counters
#[derive(Debug, Default)]
pub struct StoreStats {
    applied: AtomicU64,
    rejected: AtomicU64,
}

impl StoreStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_applied(&self) {
        self.applied.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the counters
    pub fn metrics(&self) -> StoreMetrics {
        StoreMetrics {
            writes_applied: self.applied.load(Ordering::Relaxed),
            writes_rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}
