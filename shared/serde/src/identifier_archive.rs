use log::{error, warn};

use crate::{
    archive::{ByteRead, ByteWrite, IdentifierSource},
    error::SerdeErr,
    identifier_table::LocalIdentifierTable,
    integer::UnsignedVariableInteger,
    name::{Name, MAX_NETWORKED_HARDCODED_NAME},
    serde::Serde,
};

/// A growable byte archive that interns names through an optional
/// [`LocalIdentifierTable`].
///
/// Each name is written as `[tag][payload][packed instance number]`, picking
/// the hardcoded index when the name is known to both ends, then the attached
/// table, and finally the inline string.
pub struct IdentifierWriter<'t> {
    buffer: Vec<u8>,
    table: Option<&'t mut LocalIdentifierTable>,
}

/// An [`IdentifierWriter`] with no table attached.
pub type ArchiveWriter = IdentifierWriter<'static>;

impl IdentifierWriter<'static> {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            table: None,
        }
    }
}

impl Default for IdentifierWriter<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> IdentifierWriter<'t> {
    pub fn with_table(table: &'t mut LocalIdentifierTable) -> Self {
        Self {
            buffer: Vec::new(),
            table: Some(table),
        }
    }

    pub fn with_optional_table(table: Option<&'t mut LocalIdentifierTable>) -> Self {
        Self {
            buffer: Vec::new(),
            table,
        }
    }

    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    pub fn table_mut(&mut self) -> Option<&mut LocalIdentifierTable> {
        self.table.as_deref_mut()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl<'t> ByteWrite for IdentifierWriter<'t> {
    fn write_byte(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    fn write_name(&mut self, name: &Name) {
        if let Some(index) = name.hardcoded_index() {
            self.write_byte(IdentifierSource::HardcodedIndex.tag());
            UnsignedVariableInteger::new(index).ser(self);
        } else if let Some(table) = self.table.as_deref_mut() {
            let index = table.map_name(name);
            self.write_byte(IdentifierSource::LocalIdentifierTableIndex.tag());
            UnsignedVariableInteger::new(index).ser(self);
        } else {
            self.write_byte(IdentifierSource::PlainString.tag());
            name.plain_str().to_string().ser(self);
        }
        UnsignedVariableInteger::new(name.number()).ser(self);
    }

    fn bytes_written(&self) -> usize {
        self.buffer.len()
    }
}

/// Reads archives produced by [`IdentifierWriter`].
///
/// Any failed read leaves the reader in an error state; from then on every
/// read returns [`SerdeErr::ArchiveErrored`] and the caller should drop the
/// whole payload.
pub struct IdentifierReader<'b, 't> {
    buffer: &'b [u8],
    cursor: usize,
    table: Option<&'t LocalIdentifierTable>,
    errored: bool,
}

/// An [`IdentifierReader`] with no table attached.
pub type ArchiveReader<'b> = IdentifierReader<'b, 'static>;

impl<'b> IdentifierReader<'b, 'static> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            table: None,
            errored: false,
        }
    }
}

impl<'b, 't> IdentifierReader<'b, 't> {
    pub fn with_table(buffer: &'b [u8], table: &'t LocalIdentifierTable) -> Self {
        Self::with_optional_table(buffer, Some(table))
    }

    pub fn with_optional_table(buffer: &'b [u8], table: Option<&'t LocalIdentifierTable>) -> Self {
        Self {
            buffer,
            cursor: 0,
            table,
            errored: false,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.buffer.len()
    }

    pub fn table(&self) -> Option<&'t LocalIdentifierTable> {
        self.table
    }

    /// Puts the reader in the error state and hands `error` back, for
    /// wrappers that detect bad data above the byte level.
    pub fn fail(&mut self, error: SerdeErr) -> SerdeErr {
        self.errored = true;
        error
    }

    fn check(&self) -> Result<(), SerdeErr> {
        if self.errored {
            Err(SerdeErr::ArchiveErrored)
        } else {
            Ok(())
        }
    }

    fn read_packed_u32(&mut self) -> Result<u32, SerdeErr> {
        let value = UnsignedVariableInteger::de(self).map_err(|error| self.fail(error))?;
        value.try_to_u32().map_err(|error| self.fail(error))
    }
}

impl<'b, 't> ByteRead for IdentifierReader<'b, 't> {
    fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        self.check()?;
        match self.buffer.get(self.cursor) {
            Some(byte) => {
                self.cursor += 1;
                Ok(*byte)
            }
            None => Err(self.fail(SerdeErr::UnexpectedEnd {
                needed: 1,
                remaining: 0,
            })),
        }
    }

    fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>, SerdeErr> {
        self.check()?;
        let remaining = self.remaining();
        if length > remaining {
            return Err(self.fail(SerdeErr::UnexpectedEnd {
                needed: length,
                remaining,
            }));
        }
        let bytes = self.buffer[self.cursor..self.cursor + length].to_vec();
        self.cursor += length;
        Ok(bytes)
    }

    /// An identifier tag this archive does not define means the peer runs a
    /// different data format version. The payload is dropped, the process
    /// keeps running.
    fn read_name(&mut self) -> Result<Name, SerdeErr> {
        let tag = self.read_byte()?;
        let Some(source) = IdentifierSource::from_tag(tag) else {
            error!("Unknown identifier source tag {} (data format mismatch?)", tag);
            return Err(self.fail(SerdeErr::UnknownIdentifierSource { tag }));
        };

        let base = match source {
            IdentifierSource::PlainString => {
                let text = String::de(self).map_err(|error| self.fail(error))?;
                Name::with_number(&text, 0)
            }
            IdentifierSource::HardcodedIndex => {
                let index = self.read_packed_u32()?;
                match Name::from_hardcoded_index(index) {
                    Some(name) => name,
                    None => {
                        return Err(self.fail(SerdeErr::HardcodedIndexOutOfRange {
                            index,
                            limit: MAX_NETWORKED_HARDCODED_NAME,
                        }));
                    }
                }
            }
            IdentifierSource::LocalIdentifierTableIndex => {
                let index = self.read_packed_u32()?;
                match self.table.and_then(|table| table.unmap_name(index)) {
                    Some(name) => name,
                    None => {
                        let table_len = self.table.map(LocalIdentifierTable::len);
                        warn!(
                            "Failed to resolve local identifier {} (table size: {:?})",
                            index, table_len
                        );
                        return Err(self.fail(SerdeErr::UnresolvedLocalIdentifier {
                            index,
                            table_len,
                        }));
                    }
                }
            }
        };

        let number = self.read_packed_u32()?;
        Ok(base.with_instance_number(number))
    }

    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.cursor)
    }

    fn is_error(&self) -> bool {
        self.errored
    }
}
