//! Product stock primitive.
//!
//! A typed facade over `Rowguard<Product>` for the classic inventory case:
//! several clerks adjusting the stock of the same product.
//!
//! # Example
//!
//! ```
//! use rowguard::prelude::*;
//!
//! let products = Products::ephemeral();
//! products.seed(1, "Sample Product", 10)?;
//!
//! products.adjust_stock(1, -3, ConflictPolicy::RetryOnce)?;
//! assert_eq!(products.stock(1)?, 7);
//! # Ok::<(), Error<Product>>(())
//! ```

use crate::database::Rowguard;
use crate::error::{Error, Result};
use crate::types::{Attempt, Committed, ConflictPolicy, RecordId, RecordStore, Snapshot, Version};
use serde::{Deserialize, Serialize};

/// A product and its stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name
    pub name: String,
    /// Units in stock
    pub stock_quantity: i64,
}

impl Product {
    /// Create a product.
    pub fn new(name: impl Into<String>, stock_quantity: i64) -> Self {
        Self {
            name: name.into(),
            stock_quantity,
        }
    }

    /// Copy of this product with a different stock level.
    pub fn with_stock(&self, stock_quantity: i64) -> Self {
        Self {
            name: self.name.clone(),
            stock_quantity,
        }
    }
}

/// Product stock operations.
///
/// Every write goes through the version check. The update rule is applied
/// to whatever product is current at write time, so a retried write keeps
/// the fields it does not touch as other writers left them.
pub struct Products {
    db: Rowguard<Product>,
}

impl Products {
    /// Wrap a database.
    pub fn new(db: Rowguard<Product>) -> Self {
        Self { db }
    }

    /// Products backed by a default in-memory database.
    pub fn ephemeral() -> Self {
        Self::new(Rowguard::ephemeral())
    }

    /// The underlying database.
    pub fn db(&self) -> &Rowguard<Product> {
        &self.db
    }

    /// Seed a product at version 0.
    pub fn seed(&self, id: u64, name: impl Into<String>, stock: i64) -> Result<Version, Product> {
        self.db.insert(RecordId::new(id), Product::new(name, stock))
    }

    /// Read a product and its version.
    pub fn get(&self, id: u64) -> Result<Snapshot<Product>, Product> {
        self.db.get(RecordId::new(id))
    }

    /// Current stock level.
    pub fn stock(&self, id: u64) -> Result<i64, Product> {
        Ok(self.get(id)?.payload.stock_quantity)
    }

    /// Read a product now and commit a change later.
    pub fn begin(
        &self,
        id: u64,
    ) -> Result<Attempt<'_, dyn RecordStore<Product>, Product>, Product> {
        self.db.begin(RecordId::new(id))
    }

    /// Set the stock to `quantity`.
    pub fn set_stock(
        &self,
        id: u64,
        quantity: i64,
        policy: ConflictPolicy,
    ) -> Result<Committed<Product>, Product> {
        self.db
            .update(RecordId::new(id), policy, |product| product.with_stock(quantity))
    }

    /// Add `delta` (possibly negative) to the stock.
    ///
    /// On retry the delta is added to the fresh stock level, not the one
    /// first read. Fails with `Rejected` if the new level would overflow;
    /// nothing is written in that case.
    pub fn adjust_stock(
        &self,
        id: u64,
        delta: i64,
        policy: ConflictPolicy,
    ) -> Result<Committed<Product>, Product> {
        let id = RecordId::new(id);
        self.db.try_update(id, policy, |product| {
            match product.stock_quantity.checked_add(delta) {
                Some(stock) => Ok(product.with_stock(stock)),
                None => Err(Error::Rejected {
                    id,
                    reason: format!(
                        "stock {} adjusted by {} overflows",
                        product.stock_quantity, delta
                    ),
                }),
            }
        })
    }
}
