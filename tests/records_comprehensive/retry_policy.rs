//! Retry Policy Tests
//!
//! Tests for budget handling with a store that lets rival writers in
//! between the writer's read and its write:
//! - budgets large enough to converge
//! - exhausted budgets surface the latest conflict
//! - the configured default budget
//! - backend failures are never retried

use crate::*;
use parking_lot::Mutex;
use rowguard::{ShardedStore, StorageError, StoreMetrics, WriterConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const ID: RecordId = RecordId::new(1);

/// Lets a rival add 100 units right before each of the next `rivals` writes
struct ContendedStore {
    inner: ShardedStore<Product>,
    rivals: Mutex<usize>,
}

impl ContendedStore {
    fn with_rivals(rivals: usize) -> Arc<Self> {
        let inner = ShardedStore::new();
        inner.insert(ID, Product::new("Sample Product", 10)).unwrap();
        Arc::new(Self {
            inner,
            rivals: Mutex::new(rivals),
        })
    }
}

impl RecordStore<Product> for ContendedStore {
    fn get(&self, id: RecordId) -> Result<Snapshot<Product>, Product> {
        self.inner.get(id)
    }

    fn write_if_version_matches(
        &self,
        id: RecordId,
        payload: Product,
        expected: Version,
    ) -> Result<Version, Product> {
        let rival_goes_first = {
            let mut rivals = self.rivals.lock();
            let go = *rivals > 0;
            if go {
                *rivals -= 1;
            }
            go
        };
        if rival_goes_first {
            let current = self.inner.get(id)?;
            let bumped = current.payload.with_stock(current.payload.stock_quantity + 100);
            self.inner.write_if_version_matches(id, bumped, current.version)?;
        }
        self.inner.write_if_version_matches(id, payload, expected)
    }

    fn insert(&self, id: RecordId, payload: Product) -> Result<Version, Product> {
        self.inner.insert(id, payload)
    }

    fn contains(&self, id: RecordId) -> bool {
        self.inner.contains(id)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn metrics(&self) -> StoreMetrics {
        self.inner.metrics()
    }
}

/// Backend that is always down for writes
struct UnavailableStore {
    writes: AtomicUsize,
}

impl RecordStore<Product> for UnavailableStore {
    fn get(&self, _id: RecordId) -> Result<Snapshot<Product>, Product> {
        Ok(Snapshot::new(Product::new("Sample Product", 10), Version::INITIAL))
    }

    fn write_if_version_matches(
        &self,
        _id: RecordId,
        _payload: Product,
        _expected: Version,
    ) -> Result<Version, Product> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "no route");
        Err(StorageError::with_source("backend unavailable", io).into())
    }

    fn insert(&self, _id: RecordId, _payload: Product) -> Result<Version, Product> {
        Err(StorageError::new("backend unavailable").into())
    }

    fn contains(&self, _id: RecordId) -> bool {
        true
    }

    fn len(&self) -> usize {
        1
    }
}

fn products_over(store: Arc<dyn RecordStore<Product>>, config: WriterConfig) -> Products {
    init_tracing();
    Products::new(Rowguard::with_store(store, config))
}

#[test]
fn test_budget_covers_contention() {
    let store = ContendedStore::with_rivals(3);
    let products = products_over(store, WriterConfig::default());

    let committed = products
        .adjust_stock(1, -1, ConflictPolicy::RetryWithBudget(3))
        .unwrap();

    // Three rivals added 300 before the fourth attempt landed.
    assert_eq!(committed.attempts, 4);
    assert_eq!(committed.payload.stock_quantity, 309);
    assert_eq!(committed.version, Version::new(4));
    assert_eq!(products.db().backend(), None);
}

#[test]
fn test_exhausted_budget_surfaces_latest_conflict() {
    let store = ContendedStore::with_rivals(10);
    let products = products_over(store, WriterConfig::default());

    let err = products
        .adjust_stock(1, -1, ConflictPolicy::RetryWithBudget(2))
        .unwrap_err();
    let conflict = err.into_conflict().expect("budget exhaustion is a conflict");

    // Three attempts, each overtaken by a rival.
    assert_eq!(conflict.current.payload.stock_quantity, 310);
    assert_eq!(conflict.current.version, Version::new(3));
    assert_eq!(conflict.expected, Version::new(2));

    let metrics = products.db().metrics();
    assert_eq!(metrics.conflicts, 3);
    assert_eq!(metrics.retries, 2);
    assert_eq!(metrics.surfaced_conflicts, 1);
    assert_eq!(metrics.commits, 0);
}

#[test]
fn test_fail_fast_never_retries() {
    let store = ContendedStore::with_rivals(1);
    let products = products_over(store, WriterConfig::default());

    let err = products
        .set_stock(1, 0, ConflictPolicy::FailFast)
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(products.stock(1).unwrap(), 110, "Rival's write stands");
    assert_eq!(products.db().metrics().retries, 0);
}

#[test]
fn test_retry_once_handles_single_rival() {
    let store = ContendedStore::with_rivals(1);
    let products = products_over(store, WriterConfig::default());

    let committed = products.adjust_stock(1, 5, ConflictPolicy::RetryOnce).unwrap();
    assert_eq!(committed.payload.stock_quantity, 115);
    assert_eq!(committed.attempts, 2);
}

#[test]
fn test_retry_once_gives_up_on_second_rival() {
    let store = ContendedStore::with_rivals(2);
    let products = products_over(store, WriterConfig::default());

    let err = products.adjust_stock(1, 5, ConflictPolicy::RetryOnce).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(products.stock(1).unwrap(), 210);
}

#[test]
fn test_default_policy_uses_configured_budget() {
    let store = ContendedStore::with_rivals(4);
    let products = products_over(store, WriterConfig::default().retry_budget(4));
    let committed = products.adjust_stock(1, 1, ConflictPolicy::Default).unwrap();
    assert_eq!(committed.attempts, 5);

    let store = ContendedStore::with_rivals(4);
    let products = products_over(store, WriterConfig::default().retry_budget(3));
    assert!(products
        .adjust_stock(1, 1, ConflictPolicy::Default)
        .unwrap_err()
        .is_conflict());
}

#[test]
fn test_builder_default_budget() {
    init_tracing();
    let db: Rowguard<Product> = RowguardBuilder::new().retry_budget(0).open();
    assert_eq!(db.writer_config().retry_budget, 0);
    assert_eq!(
        ConflictPolicy::Default.retry_budget(db.writer_config()),
        0
    );
}

#[test]
fn test_refresh_mode_from_conflict_converges_too() {
    let store = ContendedStore::with_rivals(2);
    let products = products_over(
        store,
        WriterConfig::default().refresh(RefreshMode::FromConflict),
    );

    let committed = products
        .adjust_stock(1, -10, ConflictPolicy::RetryWithBudget(2))
        .unwrap();
    assert_eq!(committed.payload.stock_quantity, 200);
}

#[test]
fn test_storage_failure_propagates_unchanged() {
    let store = Arc::new(UnavailableStore {
        writes: AtomicUsize::new(0),
    });
    let products = products_over(store.clone(), WriterConfig::default());

    let err = products
        .set_stock(1, 5, ConflictPolicy::RetryWithBudget(10))
        .unwrap_err();
    assert!(!err.is_conflict());
    match &err {
        Error::Storage(storage) => {
            assert_eq!(storage.message(), "backend unavailable");
            let source = std::error::Error::source(storage).map(|s| s.to_string());
            assert_eq!(source.as_deref(), Some("no route"));
        }
        other => panic!("expected storage error, got {other:?}"),
    }
    assert_eq!(store.writes.load(Ordering::SeqCst), 1);
}
