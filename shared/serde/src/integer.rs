use crate::{
    archive::{ByteRead, ByteWrite},
    error::SerdeErr,
    serde::Serde,
};

/// A non-negative integer written 7 bits per byte, least significant group
/// first, with the high bit of each byte flagging that another byte follows.
///
/// Values below 128 take a single byte. Indices and name suffixes in the
/// identifier encoding both use this form.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct UnsignedVariableInteger {
    value: u64,
}

impl UnsignedVariableInteger {
    const PAYLOAD_BITS: u32 = 7;
    const PAYLOAD_MASK: u64 = 0x7F;
    const CONTINUE_BIT: u8 = 0x80;

    pub fn new<T: Into<u64>>(value: T) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    pub fn set<T: Into<u64>>(&mut self, value: T) {
        self.value = value.into();
    }

    /// Narrows the decoded value to a `u32`, failing instead of truncating.
    pub fn try_to_u32(&self) -> Result<u32, SerdeErr> {
        u32::try_from(self.value).map_err(|_| SerdeErr::IntegerTooLarge {
            value: self.value,
            bits: 32,
        })
    }

    /// Narrows the decoded value to a `usize`, failing instead of truncating.
    pub fn try_to_usize(&self) -> Result<usize, SerdeErr> {
        usize::try_from(self.value).map_err(|_| SerdeErr::IntegerTooLarge {
            value: self.value,
            bits: usize::BITS as u8,
        })
    }

    /// Number of bytes this value occupies once written.
    pub fn byte_length(&self) -> usize {
        let mut value = self.value >> Self::PAYLOAD_BITS;
        let mut output = 1;
        while value != 0 {
            value >>= Self::PAYLOAD_BITS;
            output += 1;
        }
        output
    }
}

impl Serde for UnsignedVariableInteger {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        let mut value = self.value;
        loop {
            let mut byte = (value & Self::PAYLOAD_MASK) as u8;
            value >>= Self::PAYLOAD_BITS;
            if value != 0 {
                byte |= Self::CONTINUE_BIT;
                writer.write_byte(byte);
            } else {
                writer.write_byte(byte);
                return;
            }
        }
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        let mut output: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = reader.read_byte()?;
            let payload = u64::from(byte) & Self::PAYLOAD_MASK;

            // the tenth byte may only carry the single remaining bit
            if shift == 63 && payload > 1 {
                return Err(SerdeErr::PackedIntegerOverflow);
            }
            output |= payload << shift;

            if byte & Self::CONTINUE_BIT == 0 {
                return Ok(Self { value: output });
            }

            shift += Self::PAYLOAD_BITS;
            if shift > 63 {
                return Err(SerdeErr::PackedIntegerOverflow);
            }
        }
    }
}

impl From<u32> for UnsignedVariableInteger {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<u64> for UnsignedVariableInteger {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}
