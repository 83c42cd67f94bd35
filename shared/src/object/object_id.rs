use std::hash::{Hash, Hasher};

use tandem_serde::{ByteRead, ByteWrite, Name, Serde, SerdeErr};

use super::ObjectFlags;

/// Identifies an object by where it lives rather than by handle.
///
/// Equality and hashing only consider the class, outer and name; the flags
/// ride along so a receiver can reapply them.
#[derive(Debug, Clone, Default)]
pub struct ObjectId {
    pub class_path_name: Name,
    pub outer_path_name: Name,
    pub object_name: Name,
    pub flags: ObjectFlags,
}

impl ObjectId {
    pub fn new(
        class_path_name: Name,
        outer_path_name: Name,
        object_name: Name,
        flags: ObjectFlags,
    ) -> Self {
        Self {
            class_path_name,
            outer_path_name,
            object_name,
            flags,
        }
    }

    /// The id of no object at all.
    pub fn none() -> Self {
        Self::new(Name::none(), Name::none(), Name::none(), ObjectFlags::empty())
    }

    pub fn is_none(&self) -> bool {
        self.object_name.is_none()
    }

    /// `outer.name`, or just `name` for a root object.
    pub fn path_name(&self) -> String {
        if self.outer_path_name.is_none() {
            self.object_name.to_string()
        } else {
            super::join_path(&self.outer_path_name.to_string(), &self.object_name.to_string())
        }
    }
}

impl PartialEq for ObjectId {
    fn eq(&self, other: &Self) -> bool {
        self.class_path_name == other.class_path_name
            && self.outer_path_name == other.outer_path_name
            && self.object_name == other.object_name
    }
}

impl Eq for ObjectId {}

impl Hash for ObjectId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class_path_name.hash(state);
        self.outer_path_name.hash(state);
        self.object_name.hash(state);
    }
}

impl Serde for ObjectId {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.class_path_name.ser(writer);
        self.outer_path_name.ser(writer);
        self.object_name.ser(writer);
        self.flags.bits().ser(writer);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        let class_path_name = Name::de(reader)?;
        let outer_path_name = Name::de(reader)?;
        let object_name = Name::de(reader)?;
        let flags = ObjectFlags::from_bits_retain(u32::de(reader)?);
        Ok(Self {
            class_path_name,
            outer_path_name,
            object_name,
            flags,
        })
    }
}
