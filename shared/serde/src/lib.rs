//! # Tandem Serde
//! Byte archives, packed integers and symbolic-name interning used by the
//! tandem transaction synchronization core.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod archive;
mod error;
mod identifier_archive;
mod identifier_table;
mod integer;
mod name;
mod serde;

pub use archive::{ByteRead, ByteWrite, IdentifierSource};
pub use error::SerdeErr;
pub use identifier_archive::{ArchiveReader, ArchiveWriter, IdentifierReader, IdentifierWriter};
pub use identifier_table::{LocalIdentifierState, LocalIdentifierTable};
pub use integer::UnsignedVariableInteger;
pub use name::{Name, HARDCODED_NAMES, MAX_NETWORKED_HARDCODED_NAME};
pub use serde::{read_byte_array, write_byte_array, Serde};
