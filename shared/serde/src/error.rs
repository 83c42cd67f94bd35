use thiserror::Error;

/// Errors that can occur while reading from a byte archive.
///
/// Every reader treats these as sticky: once a read has failed the archive
/// rejects all later reads with [`SerdeErr::ArchiveErrored`], since the
/// cursor can no longer be trusted to sit on a value boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The archive ran out of bytes before a value was complete
    #[error("Unexpected end of archive: needed {needed} bytes but only {remaining} remain")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A length-prefixed string did not contain valid UTF-8
    #[error("Invalid UTF-8 in string data of {length} bytes")]
    InvalidUtf8 { length: usize },

    /// A packed integer continued past 64 bits of payload
    #[error("Packed integer exceeds 64 bits (malformed or malicious data)")]
    PackedIntegerOverflow,

    /// A packed integer decoded fine but does not fit the requested width
    #[error("Packed integer {value} does not fit in {bits} bits")]
    IntegerTooLarge { value: u64, bits: u8 },

    /// An identifier referenced a local identifier table slot that is not present
    #[error("Local identifier index {index} could not be resolved (table size: {table_len:?})")]
    UnresolvedLocalIdentifier {
        index: u32,
        table_len: Option<usize>,
    },

    /// An identifier referenced a hardcoded name outside of the shared hardcoded range
    #[error("Hardcoded name index {index} is out of range (limit {limit})")]
    HardcodedIndexOutOfRange { index: u32, limit: u32 },

    /// A name was prefixed with an identifier tag this format does not define
    #[error("Unknown identifier source tag {tag}")]
    UnknownIdentifierSource { tag: u8 },

    /// A discriminant or flag byte held a value its type does not define
    #[error("Invalid value {value} for {type_name}")]
    InvalidValue { type_name: &'static str, value: u64 },

    /// A previous read already failed on this archive
    #[error("Archive is in an error state, read rejected")]
    ArchiveErrored,
}
