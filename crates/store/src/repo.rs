//! Typed access to the `Packages`, `Marks`, `Documents` and `Files` partitions.
//!
//! The partitions are independently keyed and the store enforces no
//! relationships between them: a document without a package entry, or a mark
//! without a file, is the calling layer's business. The one exception is
//! [`Repository::record_download`], which writes a whole download as a unit.

use crate::PackageStore;
use crate::error::Result;
use crate::models::{Document, MarkState, PackageId, Revision, RevisionKey, Sequence};
use crate::schema::{self, Bucket};
use tracing::instrument;

/// Repository for package entries and everything stored per revision.
///
/// Reads against a store whose schema doesn't exist come back empty; writes
/// fail with [`ErrorKind::NotInitialized`](crate::error::ErrorKind::NotInitialized).
#[derive(Debug, Clone, Copy)]
pub struct Repository<'a> {
    store: &'a PackageStore,
}
impl<'a> From<&'a PackageStore> for Repository<'a> {
    fn from(store: &'a PackageStore) -> Self {
        Self { store }
    }
}
impl<'a> Repository<'a> {
    pub fn new(store: &'a PackageStore) -> Self {
        Self { store }
    }

    fn get(&self, bucket: Bucket, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.view(|tx| schema::get(tx, bucket, key))
    }

    fn put(&self, bucket: Bucket, key: &str, value: &[u8]) -> Result<()> {
        self.store.update(|tx| schema::put(tx, bucket, key, value))
    }

    fn remove(&self, bucket: Bucket, key: &str) -> Result<bool> {
        self.store.update(|tx| schema::remove(tx, bucket, key))
    }

    // =========================================================================
    // Packages
    // =========================================================================

    /// Record `revision` as the currently known revision of `id`.
    pub fn set_revision(&self, id: &PackageId, revision: &Revision) -> Result<()> {
        self.put(Bucket::Packages, id.as_str(), revision.as_str().as_bytes())
    }

    /// The currently known revision of `id`, if the package is known at all.
    pub fn revision(&self, id: &PackageId) -> Result<Option<Revision>> {
        self.get(Bucket::Packages, id.as_str())?
            .map(|bytes| Revision::from_bytes(&bytes))
            .transpose()
    }

    /// Forget about a package. Per-revision data is left alone.
    pub fn remove_package(&self, id: &PackageId) -> Result<bool> {
        self.remove(Bucket::Packages, id.as_str())
    }

    // =========================================================================
    // Marks
    // =========================================================================

    pub fn mark(&self, key: &RevisionKey, state: MarkState) -> Result<()> {
        self.put(Bucket::Marks, &key.encode(), &[state.to_byte()])
    }

    pub fn mark_state(&self, key: &RevisionKey) -> Result<Option<MarkState>> {
        self.get(Bucket::Marks, &key.encode())?
            .map(|bytes| MarkState::from_bytes(&bytes))
            .transpose()
    }

    /// `true` only once the revision has been marked [`MarkState::Downloaded`].
    pub fn is_downloaded(&self, key: &RevisionKey) -> Result<bool> {
        Ok(self.mark_state(key)? == Some(MarkState::Downloaded))
    }

    pub fn clear_mark(&self, key: &RevisionKey) -> Result<bool> {
        self.remove(Bucket::Marks, &key.encode())
    }

    // =========================================================================
    // Documents
    // =========================================================================

    pub fn put_document(&self, key: &RevisionKey, document: &Document) -> Result<()> {
        self.put(Bucket::Documents, &key.encode(), &document.to_vec()?)
    }

    pub fn document(&self, key: &RevisionKey) -> Result<Option<Document>> {
        self.get(Bucket::Documents, &key.encode())?
            .map(|bytes| Document::from_slice(&bytes))
            .transpose()
    }

    pub fn remove_document(&self, key: &RevisionKey) -> Result<bool> {
        self.remove(Bucket::Documents, &key.encode())
    }

    // =========================================================================
    // Files
    // =========================================================================

    pub fn put_file(&self, key: &RevisionKey, content: &[u8]) -> Result<()> {
        self.put(Bucket::Files, &key.encode(), content)
    }

    pub fn file(&self, key: &RevisionKey) -> Result<Option<Vec<u8>>> {
        self.get(Bucket::Files, &key.encode())
    }

    pub fn remove_file(&self, key: &RevisionKey) -> Result<bool> {
        self.remove(Bucket::Files, &key.encode())
    }

    // =========================================================================
    // Combined
    // =========================================================================

    /// Store a completed download in one transaction.
    ///
    /// Points the package at this revision, stores its document and file,
    /// marks it downloaded and advances the sequence. Returns the sequence
    /// assigned to this change. If any step fails, none of it is kept.
    #[instrument(skip(self, key, document, content), fields(key = %key, size = content.len()))]
    pub fn record_download(&self, key: &RevisionKey, document: &Document, content: &[u8]) -> Result<Sequence> {
        let encoded = key.encode();
        let document = document.to_vec()?;
        let sequence = self.store.update(|tx| {
            schema::put(tx, Bucket::Packages, key.id.as_str(), key.revision.as_str().as_bytes())?;
            schema::put(tx, Bucket::Documents, &encoded, &document)?;
            schema::put(tx, Bucket::Files, &encoded, content)?;
            schema::put(tx, Bucket::Marks, &encoded, &[MarkState::Downloaded.to_byte()])?;
            schema::advance_sequence(tx)
        })?;
        tracing::debug!(%sequence, "download recorded");
        Ok(sequence)
    }
}
