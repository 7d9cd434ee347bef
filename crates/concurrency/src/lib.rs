//! Concurrency layer for rowguard
//!
//! This crate implements the writer side of optimistic concurrency control:
//! - Writer: read-modify-write against a version-checked store
//! - Attempt: a held read, committed later
//! - ConflictPolicy: fail fast, retry once, or retry within a budget
//! - WriterConfig: default budget and refresh source

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod policy;
pub mod writer;

pub use policy::{ConflictPolicy, RefreshMode, WriterConfig, DEFAULT_RETRY_BUDGET};
pub use writer::{Attempt, Committed, Writer, WriterMetrics};
