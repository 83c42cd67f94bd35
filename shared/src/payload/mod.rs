mod compression_config;
mod compressor;
mod error;
mod serialized_payload;
mod typed_payload;

pub use compression_config::{CompressionConfig, CompressionMode, DEFAULT_COMPRESSION_LEVEL};
pub use compressor::PayloadCompressor;
pub use error::PayloadError;
pub use serialized_payload::SerializedPayload;
pub use typed_payload::{PayloadType, TypedPayload};
