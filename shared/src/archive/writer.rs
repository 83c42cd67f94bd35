use std::rc::Rc;

use tandem_serde::{
    write_byte_array, ByteWrite, IdentifierWriter, LocalIdentifierTable, Name, Serde,
};

use crate::object::SyncObject;

use super::{
    object_ref::{ObjectRefKind, SKIPPED_ASSET_MARKER},
    ObjectRef, PropertyFilter,
};

/// Captures object state for transport.
///
/// A whole object is written as a run of `(property name, property blob)`
/// pairs closed by `None`, followed by the object's native data. Each blob is
/// length-prefixed so a reader can step over properties it does not know.
pub struct SyncObjectWriter<'t> {
    archive: IdentifierWriter<'t>,
    filter: Rc<PropertyFilter>,
    skip_assets: bool,
}

impl<'t> SyncObjectWriter<'t> {
    /// Names are interned through `table` when one is given; snapshot
    /// payloads pass `None` and fall back to inline strings.
    pub fn new(
        table: Option<&'t mut LocalIdentifierTable>,
        filter: PropertyFilter,
        skip_assets: bool,
    ) -> Self {
        Self {
            archive: IdentifierWriter::with_optional_table(table),
            filter: Rc::new(filter),
            skip_assets,
        }
    }

    pub fn filter(&self) -> &PropertyFilter {
        &self.filter
    }

    pub fn skips_assets(&self) -> bool {
        self.skip_assets
    }

    pub fn write_object_ref(&mut self, object_ref: &ObjectRef) {
        match object_ref {
            ObjectRef::Null => {
                self.archive.write_byte(ObjectRefKind::Null.tag());
            }
            ObjectRef::Object(path) => {
                self.archive.write_byte(ObjectRefKind::Object.tag());
                self.archive.write_name(&Name::new(path));
            }
            ObjectRef::Asset(path) => {
                self.archive.write_byte(ObjectRefKind::Asset.tag());
                if self.skip_assets {
                    self.archive.write_name(&Name::new(SKIPPED_ASSET_MARKER));
                } else {
                    self.archive.write_name(&Name::new(path));
                }
            }
        }
    }

    /// Writes every eligible property of `object`, or only those named in
    /// `property_names` (top-level names) when given.
    pub fn serialize_object(&mut self, object: &dyn SyncObject, property_names: Option<&[Name]>) {
        for descriptor in object.properties() {
            if self.filter.should_skip(descriptor, property_names) {
                continue;
            }
            let name = descriptor.name();
            let mut property_writer = self.nested();
            object.serialize_property(&name, &mut property_writer);
            let bytes = property_writer.to_bytes();

            name.ser(&mut self.archive);
            write_byte_array(&mut self.archive, &bytes);
        }
        Name::none().ser(&mut self.archive);

        object.serialize_native(self);
    }

    /// Writes the value of a single property, with no framing.
    pub fn serialize_property(&mut self, object: &dyn SyncObject, property: &Name) {
        object.serialize_property(property, self);
    }

    pub fn bytes(&self) -> &[u8] {
        self.archive.bytes()
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.archive.to_bytes()
    }

    fn nested(&mut self) -> SyncObjectWriter<'_> {
        SyncObjectWriter {
            archive: IdentifierWriter::with_optional_table(self.archive.table_mut()),
            filter: self.filter.clone(),
            skip_assets: self.skip_assets,
        }
    }
}

impl ByteWrite for SyncObjectWriter<'_> {
    fn write_byte(&mut self, byte: u8) {
        self.archive.write_byte(byte);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.archive.write_bytes(bytes);
    }

    fn write_name(&mut self, name: &Name) {
        self.archive.write_name(name);
    }

    fn bytes_written(&self) -> usize {
        self.archive.bytes_written()
    }
}
