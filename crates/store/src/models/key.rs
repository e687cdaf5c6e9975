//! Keys of the `Packages`, `Marks`, `Documents` and `Files` partitions.
//!
//! `Packages` is keyed by the bare [`PackageId`]; everything that belongs to a
//! specific download is keyed by a [`RevisionKey`], encoded as `id:revision`.
//! Identifiers therefore may not contain the separator, while revisions may.

use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::{OptionExt, ResultExt};

const SEPARATOR: char = ':';

/// Logical identity of a package, independent of any revision.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageId(String);
impl PackageId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.contains(SEPARATOR) {
            exn::bail!(ErrorKind::InvalidKey(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl AsRef<str> for PackageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Revision hash of a package (opaque to the store).
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(String);
impl Revision {
    pub fn new(revision: impl Into<String>) -> Result<Self> {
        let revision = revision.into();
        if revision.is_empty() {
            exn::bail!(ErrorKind::InvalidKey(revision));
        }
        Ok(Self(revision))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let revision = std::str::from_utf8(bytes).or_raise(|| ErrorKind::InvalidData("revision"))?;
        Self::new(revision)
    }
}
impl AsRef<str> for Revision {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One particular revision of one package.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("{id}:{revision}")]
pub struct RevisionKey {
    pub id: PackageId,
    pub revision: Revision,
}
impl RevisionKey {
    pub fn new(id: PackageId, revision: Revision) -> Self {
        Self { id, revision }
    }

    /// Validate and combine raw identifier and revision strings.
    pub fn parse(id: impl Into<String>, revision: impl Into<String>) -> Result<Self> {
        Ok(Self::new(PackageId::new(id)?, Revision::new(revision)?))
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(key: &str) -> Result<Self> {
        let (id, revision) = key.split_once(SEPARATOR).ok_or_raise(|| ErrorKind::InvalidKey(key.to_string()))?;
        Self::parse(id, revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("left-pad", "3-a1b2c3")]
    #[case("@scope/pkg", "12-ffee")]
    #[case("odd", "rev:with:colons")]
    fn test_key_encoding(#[case] id: &str, #[case] revision: &str) {
        let key = RevisionKey::parse(id, revision).unwrap();
        let encoded = key.encode();
        assert_eq!(encoded, format!("{id}:{revision}"));
        assert_eq!(RevisionKey::decode(&encoded).unwrap(), key);
    }

    #[rstest]
    #[case("")]
    #[case("has:colon")]
    fn test_invalid_package_id(#[case] id: &str) {
        assert!(matches!(*PackageId::new(id).unwrap_err(), ErrorKind::InvalidKey(_)));
    }

    #[test]
    fn test_invalid_revision_keys() {
        assert!(Revision::new("").is_err());
        assert!(RevisionKey::decode("no-separator").is_err());
        assert!(RevisionKey::decode("pkg:").is_err());
        assert!(RevisionKey::decode(":rev").is_err());
    }

    #[test]
    fn test_revision_from_stored_bytes() {
        assert_eq!(Revision::from_bytes(b"1-abc").unwrap().as_str(), "1-abc");
        assert_eq!(*Revision::from_bytes(&[0xff, 0xfe]).unwrap_err(), ErrorKind::InvalidData("revision"));
    }
}
