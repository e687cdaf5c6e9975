use pocket_config::DatabaseConfig;
use pocket_store::models::{Document, RevisionKey, Sequence};
use pocket_store::{Bucket, PackageStore, Repository};
use serde_json::json;

#[test]
fn test_initialization_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig::new(dir.path().join("pocket.db"));

    let store = PackageStore::open(&config).unwrap();
    assert!(!store.is_initialized());
    store.initialize_schema().unwrap();
    assert!(store.is_initialized());
    store.close();

    let store = PackageStore::open(&config).unwrap();
    assert!(store.is_initialized());
    assert_eq!(store.partitions().unwrap(), Bucket::ALL.to_vec());
    assert_eq!(store.sequence().unwrap(), Sequence::ZERO);
    store.close();
}

#[test]
fn test_downloads_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig::new(dir.path().join("pocket.db"));
    let key = RevisionKey::parse("left-pad", "7-0d1f").unwrap();
    let document = Document::try_from(json!({"name": "left-pad", "_rev": "7-0d1f"})).unwrap();

    let store = PackageStore::open(&config).unwrap();
    assert!(store.ensure_schema().unwrap());
    let sequence = Repository::from(&store).record_download(&key, &document, b"tarball").unwrap();
    assert_eq!(sequence, Sequence::from(1));
    store.close();

    let store = PackageStore::open(&config).unwrap();
    // Reopening a populated store must not roll the counter back.
    assert!(!store.ensure_schema().unwrap());
    assert_eq!(store.sequence().unwrap(), Sequence::from(1));
    let repo = Repository::from(&store);
    assert!(repo.is_downloaded(&key).unwrap());
    assert_eq!(repo.document(&key).unwrap(), Some(document));
    assert_eq!(repo.file(&key).unwrap(), Some(b"tarball".to_vec()));
    assert_eq!(repo.revision(&key.id).unwrap(), Some(key.revision.clone()));
    store.close();
}

#[test]
fn test_relative_path_is_resolved_at_open() {
    let cwd = std::env::current_dir().unwrap();
    let dir = tempfile::tempdir_in(&cwd).unwrap();
    let relative = dir.path().strip_prefix(&cwd).unwrap().join("nested.db");
    assert!(relative.is_relative());
    let store = PackageStore::open_path(&relative).unwrap();
    assert!(store.path().is_absolute());
    assert_eq!(store.path(), cwd.join(&relative));
    assert!(cwd.join(&relative).is_file());
    store.close();
}
