use tandem_serde::SerdeErr;
use thiserror::Error;

/// Errors that can occur while packing or unpacking a payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The payload names a type this build does not know, or not the one asked for
    #[error("Payload of type '{found}' cannot be read as '{expected}'")]
    UnknownType {
        expected: &'static str,
        found: String,
    },

    /// Failed to create compressor with the specified configuration
    #[error("Failed to create compressor with compression level {level}")]
    CompressorCreationFailed { level: i32 },

    /// Compression operation failed
    #[error("Failed to compress payload of {payload_size} bytes")]
    CompressionFailed { payload_size: usize },

    /// Failed to create decompressor
    #[error("Failed to create decompressor")]
    DecompressorCreationFailed,

    /// Decompression operation failed (possibly malformed data)
    #[error("Failed to decompress payload of {payload_size} bytes into {uncompressed_size} bytes")]
    DecompressionFailed {
        payload_size: usize,
        uncompressed_size: u32,
    },

    /// The decompressed data does not have the advertised size
    #[error("Payload advertised {expected} bytes but produced {actual}")]
    SizeMismatch { expected: u32, actual: usize },

    /// The uncompressed form does not fit the 32-bit size header
    #[error("Payload of {size} bytes exceeds the 4 GiB limit")]
    TooLarge { size: usize },

    /// Fewer than the 4 header bytes were supplied
    #[error("Payload buffer of {length} bytes is missing its size header")]
    MissingHeader { length: usize },

    /// The uncompressed bytes did not decode as the expected type
    #[error("Payload data is malformed: {0}")]
    Malformed(#[from] SerdeErr),
}
