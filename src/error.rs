//! Error types for rowguard.
//!
//! Every operation returns [`Result<T, P>`], where `P` is the payload type
//! of the database. The error enum is generic over `P` because a
//! [`Conflict`] hands back the record's current payload, letting the caller
//! decide what to do without another read.
//!
//! ```
//! use rowguard::prelude::*;
//!
//! let db: Rowguard<u32> = Rowguard::ephemeral();
//! let id = RecordId::new(1);
//! db.insert(id, 10)?;
//! db.write_if_version_matches(id, 20, Version::INITIAL)?;
//!
//! match db.write_if_version_matches(id, 30, Version::INITIAL) {
//!     Err(Error::Conflict(conflict)) => assert_eq!(conflict.current.payload, 20),
//!     other => panic!("expected a conflict, got {other:?}"),
//! }
//! # Ok::<(), Error<u32>>(())
//! ```

pub use rowguard_core::{BoxError, Conflict, Error, Result, StorageError};
