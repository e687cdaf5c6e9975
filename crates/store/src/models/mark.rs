use crate::error::{ErrorKind, Result};
use derive_more::Display;

/// Download state of a single package revision.
///
/// Stored as a single byte; this is a flag, not a history.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkState {
    /// Known about, content not (fully) fetched yet.
    #[display("pending")]
    Pending,
    #[display("downloaded")]
    Downloaded,
}
impl MarkState {
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Downloaded => 1,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [0] => Ok(Self::Pending),
            [1] => Ok(Self::Downloaded),
            _ => exn::bail!(ErrorKind::InvalidData("mark")),
        }
    }
}
