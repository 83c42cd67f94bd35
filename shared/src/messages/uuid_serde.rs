use tandem_serde::{ByteRead, ByteWrite, Serde, SerdeErr};
use uuid::Uuid;

pub fn write_uuid(writer: &mut dyn ByteWrite, id: &Uuid) {
    id.as_u128().ser(writer);
}

pub fn read_uuid(reader: &mut dyn ByteRead) -> Result<Uuid, SerdeErr> {
    Ok(Uuid::from_u128(u128::de(reader)?))
}
