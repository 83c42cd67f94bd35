cfg_if! {
    if #[cfg(feature = "zstd_support")]
    {
        use zstd::bulk::{Compressor, Decompressor};

        use super::compression_config::CompressionMode;
        use super::error::PayloadError;

        /// Compresses whole payloads with zstd.
        pub struct PayloadCompressor {
            level: Option<i32>,
        }

        impl PayloadCompressor {
            pub fn new(compression_mode: &CompressionMode) -> Self {
                let level = match compression_mode {
                    CompressionMode::Default(level) => Some(*level),
                    CompressionMode::None => None,
                };
                Self { level }
            }

            /// Try to compress a payload, returning error on compression failure
            pub fn try_compress(&self, payload: &[u8]) -> Result<Vec<u8>, PayloadError> {
                let Some(level) = self.level else {
                    return Ok(payload.to_vec());
                };
                let mut compressor = Compressor::new(level)
                    .map_err(|_| PayloadError::CompressorCreationFailed { level })?;
                compressor
                    .compress(payload)
                    .map_err(|_| PayloadError::CompressionFailed {
                        payload_size: payload.len(),
                    })
            }

            /// Try to decompress a payload into exactly `uncompressed_size` bytes.
            ///
            /// The input comes from the network; malformed data is an error, never a panic.
            pub fn try_decompress(
                &self,
                payload: &[u8],
                uncompressed_size: u32,
            ) -> Result<Vec<u8>, PayloadError> {
                let bytes = if self.level.is_some() {
                    let mut decompressor =
                        Decompressor::new().map_err(|_| PayloadError::DecompressorCreationFailed)?;
                    decompressor
                        .decompress(payload, uncompressed_size as usize)
                        .map_err(|_| PayloadError::DecompressionFailed {
                            payload_size: payload.len(),
                            uncompressed_size,
                        })?
                } else {
                    payload.to_vec()
                };

                if bytes.len() != uncompressed_size as usize {
                    return Err(PayloadError::SizeMismatch {
                        expected: uncompressed_size,
                        actual: bytes.len(),
                    });
                }
                Ok(bytes)
            }
        }
    }
    else
    {
        use super::compression_config::CompressionMode;
        use super::error::PayloadError;

        /// Stores payloads uncompressed; built without `zstd_support`.
        pub struct PayloadCompressor;

        impl PayloadCompressor {
            pub fn new(_: &CompressionMode) -> Self {
                Self
            }

            pub fn try_compress(&self, payload: &[u8]) -> Result<Vec<u8>, PayloadError> {
                Ok(payload.to_vec())
            }

            pub fn try_decompress(
                &self,
                payload: &[u8],
                uncompressed_size: u32,
            ) -> Result<Vec<u8>, PayloadError> {
                if payload.len() != uncompressed_size as usize {
                    return Err(PayloadError::SizeMismatch {
                        expected: uncompressed_size,
                        actual: payload.len(),
                    });
                }
                Ok(payload.to_vec())
            }
        }
    }
}
