//! Embedded store for a package mirror.
//!
//! This crate persists which package revisions are known, whether each has
//! been downloaded, every revision's metadata document and its file content.
//! Everything lives in a single [redb](https://docs.rs/redb) file, split into
//! five named partitions (see [`Bucket`]).
//!
//! # Usage
//!
//! ```no_run
//! use pocket_config::DatabaseConfig;
//! use pocket_store::{PackageStore, Repository};
//!
//! # fn example() -> pocket_store::error::Result<()> {
//! let store = PackageStore::open(&DatabaseConfig::new("/srv/mirror/pocket.db"))?;
//! if !store.is_initialized() {
//!     store.initialize_schema()?;
//! }
//! let repo = Repository::from(&store);
//! # let _ = repo;
//! store.close();
//! # Ok(())
//! # }
//! ```
//!
//! # Sequence
//! `Globals` holds a single store-wide counter under the key `"sequence"`,
//! stored as four little-endian bytes. [`PackageStore::initialize_schema`]
//! always writes zero to it, even on a store that is already in use;
//! [`PackageStore::ensure_schema`] only seeds it when it is missing.

mod db;
pub mod error;
pub mod models;
mod repo;
mod schema;

pub use crate::db::PackageStore;
pub use crate::repo::Repository;
pub use crate::schema::Bucket;
