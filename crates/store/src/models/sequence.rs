use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::{OptionExt, ResultExt};

/// Key of the counter inside the `Globals` partition.
pub const SEQUENCE_KEY: &str = "sequence";

/// The store-wide ordering token.
///
/// Persisted as exactly four little-endian bytes. Anything else found under
/// [`SEQUENCE_KEY`] is rejected by [`Sequence::decode`].
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sequence(u32);
impl From<u32> for Sequence {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
impl From<Sequence> for u32 {
    fn from(sequence: Sequence) -> Self {
        sequence.0
    }
}
impl Sequence {
    pub const ZERO: Self = Self(0);

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn encode(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let bytes = <[u8; 4]>::try_from(bytes).or_raise(|| ErrorKind::MalformedSequence(bytes.len()))?;
        Ok(Self(u32::from_le_bytes(bytes)))
    }

    /// The following sequence, refusing to wrap back around to zero.
    pub fn next(self) -> Result<Self> {
        self.0.checked_add(1).map(Self).ok_or_raise(|| ErrorKind::SequenceOverflow)
    }
}
