//! Typed facades over [`Rowguard`](crate::Rowguard).

mod products;

pub use products::{Product, Products};
