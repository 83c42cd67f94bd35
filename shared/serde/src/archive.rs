use crate::{error::SerdeErr, name::Name};

/// A sink of bytes that knows how to encode symbolic names.
///
/// Name encoding is the one place archives differ: a plain archive writes
/// names inline (or through the hardcoded fast path), while an archive with an
/// attached identifier table interns them.
pub trait ByteWrite {
    fn write_byte(&mut self, byte: u8);

    fn write_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.write_byte(*byte);
        }
    }

    fn write_name(&mut self, name: &Name);

    fn bytes_written(&self) -> usize;
}

/// A source of bytes that knows how to decode symbolic names.
pub trait ByteRead {
    fn read_byte(&mut self) -> Result<u8, SerdeErr>;

    fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>, SerdeErr>;

    fn read_name(&mut self) -> Result<Name, SerdeErr>;

    /// Bytes left before the end of the archive.
    fn remaining(&self) -> usize;

    /// Whether a previous read failed; every later read will fail too.
    fn is_error(&self) -> bool;
}

/// The 1-byte discriminant written in front of every serialized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IdentifierSource {
    /// A length-prefixed string follows
    PlainString = 0,
    /// A packed index into [`crate::HARDCODED_NAMES`] follows
    HardcodedIndex = 1,
    /// A packed index into the attached local identifier table follows
    LocalIdentifierTableIndex = 2,
}

impl IdentifierSource {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::PlainString),
            1 => Some(Self::HardcodedIndex),
            2 => Some(Self::LocalIdentifierTableIndex),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}
