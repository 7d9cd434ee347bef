//! Basic Record Operations Tests
//!
//! Tests for:
//! - seeding (insert)
//! - get
//! - not-found and already-exists behavior

use crate::*;

#[test]
fn test_seeded_record_starts_at_version_zero() {
    test_across_backends(|products| {
        let snap = products.get(1).unwrap();
        assert_eq!(snap.payload, Product::new("Sample Product", 10));
        assert_eq!(snap.version, Version::INITIAL);
    });
}

/// Scenario 3: a missing identity is an error, not a zero-valued record
#[test]
fn test_get_missing_returns_not_found() {
    test_across_backends(|products| {
        let err = products.get(42).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, Error::NotFound(id) if id == RecordId::new(42)));
    });
}

#[test]
fn test_seed_existing_identity_fails() {
    test_across_backends(|products| {
        let err = products.seed(1, "Impostor", 999).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        let snap = products.get(1).unwrap();
        assert_eq!(snap.payload.name, "Sample Product");
        assert_eq!(snap.version, Version::INITIAL);
    });
}

#[test]
fn test_reads_have_no_side_effects() {
    test_across_backends(|products| {
        for _ in 0..10 {
            products.get(1).unwrap();
        }
        assert_eq!(products.get(1).unwrap().version, Version::INITIAL);
        assert_eq!(products.db().metrics().writes_applied, 0);
    });
}

#[test]
fn test_records_are_independent() {
    test_across_backends(|products| {
        products.seed(2, "Other", 5).unwrap();
        products.set_stock(2, 6, ConflictPolicy::FailFast).unwrap();

        assert_eq!(products.get(1).unwrap().version, Version::INITIAL);
        assert_eq!(products.get(2).unwrap().version, Version::new(1));
        assert_eq!(products.db().len(), 2);
        assert!(products.db().contains(RecordId::new(2)));
        assert!(!products.db().contains(RecordId::new(3)));
    });
}

#[test]
fn test_update_missing_record_is_not_found() {
    test_across_backends(|products| {
        let err = products
            .set_stock(7, 1, ConflictPolicy::RetryWithBudget(3))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!products.db().contains(RecordId::new(7)), "Update must not create records");
    });
}
