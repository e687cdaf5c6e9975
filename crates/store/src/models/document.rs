use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde_json::{Map, Value};

/// Full metadata document of a package revision.
///
/// Always a JSON object; arrays, strings and other bare values are rejected
/// both when constructing a document and when reading one back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document(Map<String, Value>);
impl TryFrom<Value> for Document {
    type Error = crate::error::Error;
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => exn::bail!(ErrorKind::InvalidDocument),
        }
    }
}
impl From<Document> for Value {
    fn from(document: Document) -> Self {
        Value::Object(document.0)
    }
}
impl Document {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).or_raise(|| ErrorKind::InvalidDocument)?;
        Self::try_from(value)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.0).or_raise(|| ErrorKind::InvalidDocument)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_object_document() {
        let document = Document::try_from(json!({"name": "left-pad", "versions": {"1.3.0": {}}})).unwrap();
        assert_eq!(document.get("name"), Some(&json!("left-pad")));
        let bytes = document.to_vec().unwrap();
        assert_eq!(Document::from_slice(&bytes).unwrap(), document);
    }

    #[rstest]
    #[case(json!([1, 2, 3]))]
    #[case(json!("left-pad"))]
    #[case(json!(null))]
    fn test_non_object_rejected(#[case] value: Value) {
        assert_eq!(*Document::try_from(value).unwrap_err(), ErrorKind::InvalidDocument);
    }

    #[rstest]
    #[case(b"")]
    #[case(b"{\"name\":")]
    #[case(b"[]")]
    fn test_malformed_bytes_rejected(#[case] bytes: &[u8]) {
        assert_eq!(*Document::from_slice(bytes).unwrap_err(), ErrorKind::InvalidDocument);
    }
}
