use std::rc::Rc;

use log::{trace, warn};

use tandem_serde::{
    read_byte_array, ByteRead, IdentifierReader, LocalIdentifierTable, Name, Serde, SerdeErr,
};

use crate::object::{find_property, ObjectWorld, SyncObject};

use super::{
    object_ref::{ObjectRefKind, SKIPPED_ASSET_MARKER},
    ObjectRef, WorldRemapper,
};

/// Reads state written by a [`SyncObjectWriter`](super::SyncObjectWriter)
/// back into a live object.
///
/// Object references are remapped on the way in. Paths that may need to be
/// brought into memory are collected and handed to
/// [`resolve_pending_loads`] once the read is done.
pub struct SyncObjectReader<'b, 't> {
    archive: IdentifierReader<'b, 't>,
    remapper: Rc<WorldRemapper>,
    pending_loads: Vec<String>,
}

impl<'b, 't> SyncObjectReader<'b, 't> {
    pub fn new(
        bytes: &'b [u8],
        table: Option<&'t LocalIdentifierTable>,
        remapper: WorldRemapper,
    ) -> Self {
        Self {
            archive: IdentifierReader::with_optional_table(bytes, table),
            remapper: Rc::new(remapper),
            pending_loads: Vec::new(),
        }
    }

    pub fn remapper(&self) -> &WorldRemapper {
        &self.remapper
    }

    /// Reads a reference into `target`. A skipped asset leaves `target` as it
    /// was.
    pub fn read_object_ref(&mut self, target: &mut ObjectRef) -> Result<(), SerdeErr> {
        let tag = self.archive.read_byte()?;
        let Some(kind) = ObjectRefKind::from_tag(tag) else {
            return Err(self.archive.fail(SerdeErr::InvalidValue {
                type_name: "ObjectRef",
                value: u64::from(tag),
            }));
        };

        match kind {
            ObjectRefKind::Null => {
                *target = ObjectRef::Null;
            }
            ObjectRefKind::Object => {
                let path = self.archive.read_name()?.to_string();
                let path = self.remapper.remap_object_path(&path);
                self.pending_loads.push(path.clone());
                *target = ObjectRef::Object(path);
            }
            ObjectRefKind::Asset => {
                let path = self.archive.read_name()?.to_string();
                if path != SKIPPED_ASSET_MARKER {
                    self.pending_loads.push(path.clone());
                    *target = ObjectRef::Asset(path);
                }
            }
        }
        Ok(())
    }

    /// Reads a whole-object payload. Properties `object` no longer has are
    /// stepped over.
    pub fn deserialize_object(&mut self, object: &mut dyn SyncObject) -> Result<(), SerdeErr> {
        loop {
            let name = Name::de(&mut self.archive)?;
            if name.is_none() {
                break;
            }
            let bytes = read_byte_array(&mut self.archive)?;
            if find_property(&*object, &name).is_none() {
                trace!("Skipping serialized property '{}' missing from object", name);
                continue;
            }

            let mut property_reader = SyncObjectReader {
                archive: IdentifierReader::with_optional_table(&bytes, self.archive.table()),
                remapper: self.remapper.clone(),
                pending_loads: Vec::new(),
            };
            if let Err(error) = object.deserialize_property(&name, &mut property_reader) {
                return Err(self.archive.fail(error));
            }
            self.pending_loads.append(&mut property_reader.pending_loads);
        }

        object.deserialize_native(self)
    }

    /// Reads a single unframed property value. Does nothing if `object` has no
    /// such property.
    pub fn deserialize_property(
        &mut self,
        object: &mut dyn SyncObject,
        property: &Name,
    ) -> Result<(), SerdeErr> {
        if find_property(&*object, property).is_none() {
            trace!("Skipping serialized property '{}' missing from object", property);
            return Ok(());
        }
        object.deserialize_property(property, self)
    }

    pub fn take_pending_loads(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_loads)
    }

    pub fn is_at_end(&self) -> bool {
        self.archive.is_at_end()
    }
}

impl ByteRead for SyncObjectReader<'_, '_> {
    fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        self.archive.read_byte()
    }

    fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>, SerdeErr> {
        self.archive.read_bytes(length)
    }

    fn read_name(&mut self) -> Result<Name, SerdeErr> {
        self.archive.read_name()
    }

    fn remaining(&self) -> usize {
        self.archive.remaining()
    }

    fn is_error(&self) -> bool {
        self.archive.is_error()
    }
}

/// Loads every referenced object that is neither in memory nor part of a
/// remapped world. Returns how many loads succeeded.
pub fn resolve_pending_loads(
    world: &mut dyn ObjectWorld,
    remapper: &WorldRemapper,
    paths: &[String],
) -> usize {
    let mut loaded = 0;
    for path in paths {
        if world.find_object_by_path(path).is_some() || remapper.has_matching_world(path) {
            continue;
        }
        if world.load_object(path).is_some() {
            loaded += 1;
        } else {
            warn!("Failed to load referenced object '{}'", path);
        }
    }
    loaded
}
