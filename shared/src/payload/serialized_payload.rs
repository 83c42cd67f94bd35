use tandem_serde::{
    read_byte_array, write_byte_array, ArchiveReader, ArchiveWriter, ByteRead, ByteWrite, Serde,
    SerdeErr,
};

use super::{compressor::PayloadCompressor, CompressionConfig, PayloadError};

/// A value serialized through a plain archive and then compressed.
///
/// Meant for coarse one-shot payloads such as whole events; names inside go
/// through the hardcoded table or inline strings, never an identifier table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedPayload {
    uncompressed_size: u32,
    data: Vec<u8>,
}

impl SerializedPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uncompressed_size(&self) -> u32 {
        self.uncompressed_size
    }

    /// The compressed bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.uncompressed_size == 0
    }

    /// Serializes and compresses `value`. On failure the payload is left
    /// empty.
    pub fn try_set_payload<T: Serde>(
        &mut self,
        value: &T,
        compression: &CompressionConfig,
    ) -> Result<(), PayloadError> {
        let mut writer = ArchiveWriter::new();
        value.ser(&mut writer);
        let bytes = writer.to_bytes();

        match Self::compress(&bytes, compression) {
            Ok((uncompressed_size, data)) => {
                self.uncompressed_size = uncompressed_size;
                self.data = data;
                Ok(())
            }
            Err(error) => {
                self.reset();
                Err(error)
            }
        }
    }

    pub fn try_from_value<T: Serde>(
        value: &T,
        compression: &CompressionConfig,
    ) -> Result<Self, PayloadError> {
        let mut payload = Self::new();
        payload.try_set_payload(value, compression)?;
        Ok(payload)
    }

    /// Decompresses and deserializes the payload. An empty payload yields
    /// `T::default()`.
    pub fn try_get_payload<T: Serde + Default>(
        &self,
        compression: &CompressionConfig,
    ) -> Result<T, PayloadError> {
        if self.uncompressed_size == 0 {
            return Ok(T::default());
        }
        let bytes = PayloadCompressor::new(&compression.mode)
            .try_decompress(&self.data, self.uncompressed_size)?;
        let mut reader = ArchiveReader::new(&bytes);
        Ok(T::de(&mut reader)?)
    }

    /// crc32c of the compressed bytes.
    pub fn hash(&self) -> u32 {
        crc32c::crc32c(&self.data)
    }

    pub fn reset(&mut self) {
        self.uncompressed_size = 0;
        self.data.clear();
    }

    /// `[u32 LE uncompressed size][compressed bytes]`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + self.data.len());
        bytes.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        bytes.extend_from_slice(&self.data);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PayloadError> {
        if bytes.len() < 4 {
            return Err(PayloadError::MissingHeader {
                length: bytes.len(),
            });
        }
        let (header, data) = bytes.split_at(4);
        let uncompressed_size = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        Ok(Self {
            uncompressed_size,
            data: data.to_vec(),
        })
    }

    fn compress(
        bytes: &[u8],
        compression: &CompressionConfig,
    ) -> Result<(u32, Vec<u8>), PayloadError> {
        if bytes.is_empty() {
            return Ok((0, Vec::new()));
        }
        let uncompressed_size =
            u32::try_from(bytes.len()).map_err(|_| PayloadError::TooLarge { size: bytes.len() })?;
        let data = PayloadCompressor::new(&compression.mode).try_compress(bytes)?;
        Ok((uncompressed_size, data))
    }
}

impl Serde for SerializedPayload {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.uncompressed_size.ser(writer);
        write_byte_array(writer, &self.data);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        let uncompressed_size = u32::de(reader)?;
        let data = read_byte_array(reader)?;
        Ok(Self {
            uncompressed_size,
            data,
        })
    }
}
