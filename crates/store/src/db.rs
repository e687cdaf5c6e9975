//! Store file lifecycle, schema setup and transaction helpers.

use crate::error::{ErrorKind, Result};
use crate::models::{SEQUENCE_KEY, Sequence};
use crate::schema::{self, Bucket};
use exn::{OptionExt, ResultExt};
use pocket_config::{DATABASE_FILE_MODE, DatabaseConfig};
use redb::{Database, ReadTransaction, WriteTransaction};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Handle to an open package store file.
///
/// This is the main entry point for interacting with the store. It owns the
/// underlying redb database; reads and writes of individual partitions go
/// through a [`Repository`](crate::Repository) borrowed from it.
///
/// # Lifecycle
///
/// `open` → (`initialize_schema` | `ensure_schema`) → `close`. Closing
/// consumes the handle, so nothing can be done with a closed store.
pub struct PackageStore {
    db: Database,
    path: PathBuf,
}
impl fmt::Debug for PackageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageStore").field("path", &self.path).finish_non_exhaustive()
    }
}

impl PackageStore {
    /// Open (or create) the store file named by the configuration.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        Self::open_path(&config.path)
    }

    /// Open (or create) the store file at `path`.
    ///
    /// Relative paths are resolved against the current working directory
    /// first, so the handle keeps pointing at the same file if the process
    /// changes directory later. A new file is created with owner-only
    /// permissions.
    ///
    /// Failing to open is reported as [`ErrorKind::Open`]; whether that means
    /// exiting, retrying or degrading is up to the caller.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = std::path::absolute(path.as_ref()).or_raise(|| ErrorKind::Open(path.as_ref().to_path_buf()))?;
        let db = Self::prepare_file(&path)
            .or_raise(|| ErrorKind::Open(path.clone()))
            .and_then(|()| Database::create(&path).or_raise(|| ErrorKind::Open(path.clone())))
            .inspect_err(|err| tracing::error!(path = %path.display(), error = ?err, "failed to load database file"))?;
        tracing::info!(path = %path.display(), "package store opened");
        Ok(Self { db, path })
    }

    /// Create the file up front with fixed permissions; redb has no option
    /// for the mode of the files it creates.
    #[cfg(unix)]
    fn prepare_file(path: &Path) -> std::io::Result<()> {
        use std::os::unix::fs::OpenOptionsExt;
        std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .mode(DATABASE_FILE_MODE)
            .open(path)
            .map(drop)
    }

    #[cfg(not(unix))]
    fn prepare_file(_path: &Path) -> std::io::Result<()> {
        Ok(())
    }

    /// Absolute path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and release the store file (and its lock).
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn close(self) {
        drop(self.db);
        tracing::info!("package store closed");
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Run `f` inside a single read-write transaction.
    ///
    /// Commits when `f` returns `Ok`; aborts when it returns `Err`, in which
    /// case nothing `f` wrote becomes visible. Errors from `f` and from the
    /// commit itself are returned to the caller as-is.
    pub fn update<T>(&self, f: impl FnOnce(&WriteTransaction) -> Result<T>) -> Result<T> {
        let tx = self.db.begin_write().or_raise(|| ErrorKind::Transaction)?;
        match f(&tx) {
            Ok(value) => {
                tx.commit().or_raise(|| ErrorKind::Transaction)?;
                Ok(value)
            },
            Err(err) => {
                if let Err(abort) = tx.abort() {
                    tracing::warn!(error = %abort, "failed to abort write transaction");
                }
                Err(err)
            },
        }
    }

    /// Run `f` against a consistent read-only snapshot.
    pub fn view<T>(&self, f: impl FnOnce(&ReadTransaction) -> Result<T>) -> Result<T> {
        let tx = self.db.begin_read().or_raise(|| ErrorKind::Transaction)?;
        f(&tx)
    }

    // =========================================================================
    // Schema
    // =========================================================================

    /// Create all five partitions and (re)seed the sequence with zero.
    ///
    /// Creating the partitions is idempotent, but **the sequence is always
    /// overwritten**: calling this on a store that has been in use rolls the
    /// counter back to zero. Use [`ensure_schema`](Self::ensure_schema) unless
    /// that is what you want.
    ///
    /// Either every partition and the seed are committed, or nothing is.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn initialize_schema(&self) -> Result<()> {
        self.update(|tx| {
            schema::create(tx)?;
            schema::write_sequence(tx, Sequence::ZERO)
        })?;
        tracing::info!("schema initialized");
        Ok(())
    }

    /// Create whatever part of the schema is missing, leaving an existing
    /// sequence alone. Returns `true` if the sequence had to be seeded.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn ensure_schema(&self) -> Result<bool> {
        let seeded = self.update(|tx| {
            schema::create(tx)?;
            if schema::raw_sequence(tx)?.is_some() {
                return Ok(false);
            }
            schema::write_sequence(tx, Sequence::ZERO)?;
            Ok(true)
        })?;
        tracing::info!(seeded, "schema ensured");
        Ok(seeded)
    }

    /// Whether the schema has been created.
    ///
    /// The presence of the sequence entry is the only thing checked; its
    /// content isn't validated. This never fails: any engine error is logged
    /// and reported as "not initialized".
    pub fn is_initialized(&self) -> bool {
        match self.view(|tx| schema::get(tx, Bucket::Globals, SEQUENCE_KEY)) {
            Ok(value) => value.is_some(),
            Err(err) => {
                tracing::debug!(error = ?err, "initialization check failed, reporting uninitialized");
                false
            },
        }
    }

    /// Which of the known partitions currently exist.
    pub fn partitions(&self) -> Result<Vec<Bucket>> {
        self.view(schema::existing)
    }

    // =========================================================================
    // Sequence
    // =========================================================================

    /// Current value of the sequence counter.
    ///
    /// Unlike [`is_initialized`](Self::is_initialized) this decodes strictly
    /// and fails with [`ErrorKind::MalformedSequence`] on anything that isn't
    /// exactly four bytes.
    pub fn sequence(&self) -> Result<Sequence> {
        let raw = self
            .view(|tx| schema::get(tx, Bucket::Globals, SEQUENCE_KEY))?
            .ok_or_raise(|| ErrorKind::NotInitialized)?;
        Sequence::decode(&raw)
    }

    /// Atomically increment the counter, returning the new value.
    pub fn advance_sequence(&self) -> Result<Sequence> {
        self.update(schema::advance_sequence)
    }

    /// Record an externally assigned sequence (e.g. an upstream feed position).
    pub fn set_sequence(&self, sequence: Sequence) -> Result<()> {
        self.update(|tx| schema::write_sequence(tx, sequence))
    }

    /// Explicitly put the counter back to zero.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn reset_sequence(&self) -> Result<()> {
        self.update(|tx| schema::write_sequence(tx, Sequence::ZERO))?;
        tracing::info!("sequence reset");
        Ok(())
    }
}
