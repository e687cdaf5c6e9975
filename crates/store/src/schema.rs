//! Partition ("bucket") layout of the store file.
//!
//! Every partition is a redb table with `&str` keys and opaque `&[u8]` values;
//! typing happens one level up, in [`crate::models`] and [`crate::Repository`].
//!
//! | Partition   | Key                     | Value                       |
//! |-------------|-------------------------|-----------------------------|
//! | `Globals`   | `"sequence"`            | 4-byte little-endian `u32`  |
//! | `Packages`  | package identifier      | revision hash               |
//! | `Marks`     | `identifier:revision`   | one-byte download flag      |
//! | `Documents` | `identifier:revision`   | JSON metadata document      |
//! | `Files`     | `identifier:revision`   | raw file bytes              |

use crate::error::{ErrorKind, Result};
use crate::models::{SEQUENCE_KEY, Sequence};
use derive_more::Display;
use exn::{OptionExt, ResultExt};
use redb::{ReadTransaction, ReadableTable, Table, TableDefinition, TableError, TableHandle, WriteTransaction};

pub(crate) type Definition = TableDefinition<'static, &'static str, &'static [u8]>;
pub(crate) type WriteTable<'txn> = Table<'txn, &'static str, &'static [u8]>;

/// One of the five named partitions of the keyspace.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Store-wide values, currently only the sequence counter.
    Globals,
    /// Package identifier to currently known revision.
    Packages,
    /// Whether a revision has finished downloading.
    Marks,
    /// Metadata document per revision.
    Documents,
    /// Downloaded artifact per revision.
    Files,
}
impl Bucket {
    pub const ALL: [Bucket; 5] = [Self::Globals, Self::Packages, Self::Marks, Self::Documents, Self::Files];

    /// Name of the underlying table. Part of the on-disk format.
    pub fn name(self) -> &'static str {
        match self {
            Self::Globals => "Globals",
            Self::Packages => "Packages",
            Self::Marks => "Marks",
            Self::Documents => "Documents",
            Self::Files => "Files",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.name() == name)
    }

    pub(crate) fn definition(self) -> Definition {
        TableDefinition::new(self.name())
    }
}

/// Create every partition that doesn't exist yet. Existing ones are untouched.
pub(crate) fn create(tx: &WriteTransaction) -> Result<()> {
    for bucket in Bucket::ALL {
        tx.open_table(bucket.definition()).or_raise(|| ErrorKind::Transaction)?;
    }
    Ok(())
}

pub(crate) fn exists(tx: &WriteTransaction, bucket: Bucket) -> Result<bool> {
    let mut tables = tx.list_tables().or_raise(|| ErrorKind::Transaction)?;
    Ok(tables.any(|table| table.name() == bucket.name()))
}

/// Open a partition for writing without creating it.
///
/// Writes against a store whose schema was never created fail instead of
/// quietly growing a partial schema.
pub(crate) fn open<'txn>(tx: &'txn WriteTransaction, bucket: Bucket) -> Result<WriteTable<'txn>> {
    if !exists(tx, bucket)? {
        exn::bail!(ErrorKind::NotInitialized);
    }
    tx.open_table(bucket.definition()).or_raise(|| ErrorKind::Transaction)
}

/// Partitions present in the snapshot, in [`Bucket::ALL`] order.
pub(crate) fn existing(tx: &ReadTransaction) -> Result<Vec<Bucket>> {
    let names: Vec<String> = tx
        .list_tables()
        .or_raise(|| ErrorKind::Transaction)?
        .map(|table| table.name().to_string())
        .collect();
    Ok(Bucket::ALL.into_iter().filter(|bucket| names.iter().any(|name| name == bucket.name())).collect())
}

/// Point lookup in a read snapshot. A missing partition reads as a missing key.
pub(crate) fn get(tx: &ReadTransaction, bucket: Bucket, key: &str) -> Result<Option<Vec<u8>>> {
    let table = match tx.open_table(bucket.definition()) {
        Ok(table) => table,
        Err(TableError::TableDoesNotExist(_)) => return Ok(None),
        Err(err) => return Err(err).or_raise(|| ErrorKind::Transaction),
    };
    let value = table.get(key).or_raise(|| ErrorKind::Transaction)?;
    Ok(value.map(|guard| guard.value().to_vec()))
}

pub(crate) fn put(tx: &WriteTransaction, bucket: Bucket, key: &str, value: &[u8]) -> Result<()> {
    let mut table = open(tx, bucket)?;
    table.insert(key, value).or_raise(|| ErrorKind::Transaction)?;
    Ok(())
}

/// Returns `true` if the key was present.
pub(crate) fn remove(tx: &WriteTransaction, bucket: Bucket, key: &str) -> Result<bool> {
    let mut table = open(tx, bucket)?;
    let removed = table.remove(key).or_raise(|| ErrorKind::Transaction)?;
    Ok(removed.is_some())
}

/// Raw sequence bytes as seen by the write transaction, if any.
pub(crate) fn raw_sequence(tx: &WriteTransaction) -> Result<Option<Vec<u8>>> {
    let table = open(tx, Bucket::Globals)?;
    let value = table.get(SEQUENCE_KEY).or_raise(|| ErrorKind::Transaction)?;
    Ok(value.map(|guard| guard.value().to_vec()))
}

/// Strictly decoded sequence within a write transaction.
pub(crate) fn sequence(tx: &WriteTransaction) -> Result<Sequence> {
    let raw = raw_sequence(tx)?.ok_or_raise(|| ErrorKind::NotInitialized)?;
    Sequence::decode(&raw)
}

pub(crate) fn write_sequence(tx: &WriteTransaction, sequence: Sequence) -> Result<()> {
    put(tx, Bucket::Globals, SEQUENCE_KEY, &sequence.encode())
}

/// Increment the counter and return the new value.
pub(crate) fn advance_sequence(tx: &WriteTransaction) -> Result<Sequence> {
    let next = sequence(tx)?.next()?;
    write_sequence(tx, next)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Bucket::Globals, "Globals")]
    #[case(Bucket::Packages, "Packages")]
    #[case(Bucket::Marks, "Marks")]
    #[case(Bucket::Documents, "Documents")]
    #[case(Bucket::Files, "Files")]
    fn test_bucket_names(#[case] bucket: Bucket, #[case] name: &str) {
        assert_eq!(bucket.name(), name);
        assert_eq!(bucket.to_string(), name);
        assert_eq!(Bucket::from_name(name), Some(bucket));
    }

    #[test]
    fn test_unknown_bucket_name() {
        assert_eq!(Bucket::from_name("globals"), None);
        assert_eq!(Bucket::from_name(""), None);
    }
}
