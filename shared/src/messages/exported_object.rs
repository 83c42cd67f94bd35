use tandem_serde::{read_byte_array, write_byte_array, ByteRead, ByteWrite, Name, Serde, SerdeErr};

use crate::object::ObjectId;

/// One top-level property's serialized value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedPropertyData {
    pub property_name: Name,
    pub serialized_data: Vec<u8>,
}

impl SerializedPropertyData {
    pub fn new(property_name: Name, serialized_data: Vec<u8>) -> Self {
        Self {
            property_name,
            serialized_data,
        }
    }
}

/// Object-level part of an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectData {
    /// The receiver may construct the object if it cannot find it
    pub allow_create: bool,
    pub is_pending_kill: bool,
    /// `None` unless the object was renamed
    pub new_name: Name,
    /// `None` unless the object was moved to another outer
    pub new_outer_path_name: Name,
    /// Whole-object payload; when present it replaces the per-property data
    pub serialized_data: Vec<u8>,
}

impl ObjectData {
    pub fn has_rename(&self) -> bool {
        !self.new_name.is_none() || !self.new_outer_path_name.is_none()
    }
}

/// Everything one transaction changed on one object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedObject {
    pub object_id: ObjectId,
    /// Length of the object's outer chain, itself included
    pub object_path_depth: u32,
    pub object_data: ObjectData,
    pub property_datas: Vec<SerializedPropertyData>,
    pub serialized_annotation_data: Vec<u8>,
}

impl ExportedObject {
    pub fn new(object_id: ObjectId, object_path_depth: u32) -> Self {
        Self {
            object_id,
            object_path_depth,
            ..Self::default()
        }
    }

    /// The outer path the object ends up under after this update.
    pub fn effective_outer_path_name(&self) -> &Name {
        if self.object_data.new_outer_path_name.is_none() {
            &self.object_id.outer_path_name
        } else {
            &self.object_data.new_outer_path_name
        }
    }

    pub fn find_property_data_mut(&mut self, property_name: &Name) -> Option<&mut SerializedPropertyData> {
        self.property_datas
            .iter_mut()
            .find(|data| &data.property_name == property_name)
    }
}

impl Serde for SerializedPropertyData {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.property_name.ser(writer);
        write_byte_array(writer, &self.serialized_data);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        Ok(Self {
            property_name: Name::de(reader)?,
            serialized_data: read_byte_array(reader)?,
        })
    }
}

impl Serde for ObjectData {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.allow_create.ser(writer);
        self.is_pending_kill.ser(writer);
        self.new_name.ser(writer);
        self.new_outer_path_name.ser(writer);
        write_byte_array(writer, &self.serialized_data);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        Ok(Self {
            allow_create: bool::de(reader)?,
            is_pending_kill: bool::de(reader)?,
            new_name: Name::de(reader)?,
            new_outer_path_name: Name::de(reader)?,
            serialized_data: read_byte_array(reader)?,
        })
    }
}

impl Serde for ExportedObject {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.object_id.ser(writer);
        self.object_path_depth.ser(writer);
        self.object_data.ser(writer);
        self.property_datas.ser(writer);
        write_byte_array(writer, &self.serialized_annotation_data);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        Ok(Self {
            object_id: ObjectId::de(reader)?,
            object_path_depth: u32::de(reader)?,
            object_data: ObjectData::de(reader)?,
            property_datas: Vec::<SerializedPropertyData>::de(reader)?,
            serialized_annotation_data: read_byte_array(reader)?,
        })
    }
}
