mod document;
mod key;
mod mark;
mod sequence;

pub use self::document::Document;
pub use self::key::{PackageId, Revision, RevisionKey};
pub use self::mark::MarkState;
pub use self::sequence::{SEQUENCE_KEY, Sequence};
