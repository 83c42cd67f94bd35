use crate::{
    archive::{ByteRead, ByteWrite},
    error::SerdeErr,
    integer::UnsignedVariableInteger,
    name::Name,
};

/// A value that can be written to and read back from a byte archive.
pub trait Serde: Sized {
    fn ser(&self, writer: &mut dyn ByteWrite);

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr>;
}

macro_rules! impl_serde_for_le_bytes {
    ($($ty:ty),*) => {
        $(
            impl Serde for $ty {
                fn ser(&self, writer: &mut dyn ByteWrite) {
                    writer.write_bytes(&self.to_le_bytes());
                }

                fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
                    let bytes = reader.read_bytes(std::mem::size_of::<$ty>())?;
                    let mut array = [0_u8; std::mem::size_of::<$ty>()];
                    array.copy_from_slice(&bytes);
                    Ok(<$ty>::from_le_bytes(array))
                }
            }
        )*
    };
}

impl_serde_for_le_bytes!(u16, u32, u64, u128, i16, i32, i64, f32, f64);

impl Serde for u8 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(*self);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        reader.read_byte()
    }
}

impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(SerdeErr::InvalidValue {
                type_name: "bool",
                value: u64::from(value),
            }),
        }
    }
}

impl Serde for String {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        UnsignedVariableInteger::new(self.len() as u64).ser(writer);
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        let length = UnsignedVariableInteger::de(reader)?.try_to_usize()?;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes).map_err(|_| SerdeErr::InvalidUtf8 { length })
    }
}

impl Serde for Name {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_name(self);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        reader.read_name()
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        match self {
            Some(value) => {
                true.ser(writer);
                value.ser(writer);
            }
            None => false.ser(writer),
        }
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        UnsignedVariableInteger::new(self.len() as u64).ser(writer);
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        let length = UnsignedVariableInteger::de(reader)?.try_to_usize()?;
        // every element occupies at least one byte, so cap the up-front allocation
        let mut output = Vec::with_capacity(length.min(reader.remaining()));
        for _ in 0..length {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }
}

/// Writes a byte blob with a packed length prefix.
pub fn write_byte_array(writer: &mut dyn ByteWrite, bytes: &[u8]) {
    UnsignedVariableInteger::new(bytes.len() as u64).ser(writer);
    writer.write_bytes(bytes);
}

/// Reads a byte blob written by [`write_byte_array`].
pub fn read_byte_array(reader: &mut dyn ByteRead) -> Result<Vec<u8>, SerdeErr> {
    let length = UnsignedVariableInteger::de(reader)?.try_to_usize()?;
    reader.read_bytes(length)
}
