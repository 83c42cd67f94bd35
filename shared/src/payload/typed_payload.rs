use tandem_serde::{ArchiveReader, ArchiveWriter, ByteRead, ByteWrite, Serde, SerdeErr};

use super::{CompressionConfig, PayloadError, SerializedPayload};

/// A value that can travel inside a [`TypedPayload`].
pub trait PayloadType: Serde + Default {
    /// Stable name a receiver uses to pick the type back up.
    const TYPE_NAME: &'static str;
}

/// A [`SerializedPayload`] tagged with the name of the type inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedPayload {
    pub type_name: String,
    pub payload: SerializedPayload,
}

impl TypedPayload {
    pub fn try_new<T: PayloadType>(
        value: &T,
        compression: &CompressionConfig,
    ) -> Result<Self, PayloadError> {
        Ok(Self {
            type_name: T::TYPE_NAME.to_string(),
            payload: SerializedPayload::try_from_value(value, compression)?,
        })
    }

    pub fn is<T: PayloadType>(&self) -> bool {
        self.type_name == T::TYPE_NAME
    }

    pub fn try_get<T: PayloadType>(
        &self,
        compression: &CompressionConfig,
    ) -> Result<T, PayloadError> {
        if !self.is::<T>() {
            return Err(PayloadError::UnknownType {
                expected: T::TYPE_NAME,
                found: self.type_name.clone(),
            });
        }
        self.payload.try_get_payload(compression)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ArchiveWriter::new();
        self.ser(&mut writer);
        writer.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = ArchiveReader::new(bytes);
        Ok(Self::de(&mut reader)?)
    }
}

impl Serde for TypedPayload {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.type_name.ser(writer);
        self.payload.ser(writer);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        let type_name = String::de(reader)?;
        let payload = SerializedPayload::de(reader)?;
        Ok(Self { type_name, payload })
    }
}
