/// Synced object types used across the integration tests

use std::{any::Any, rc::Rc};

use tandem_shared::{
    ByteRead, Name, ObjectRef, PropertyDescriptor, PropertyFlags, Serde, SerdeErr, SyncObject,
    SyncObjectReader, SyncObjectWriter, TransactionAnnotation,
};

pub const PACKAGE_CLASS: &str = "/Script/CoreUObject.Package";
pub const WORLD_CLASS: &str = "/Script/Engine.World";
pub const LEVEL_CLASS: &str = "/Script/Engine.Level";
pub const LIGHT_CLASS: &str = "/Script/Engine.PointLight";
pub const MARKER_CLASS: &str = "/Script/Engine.Marker";

// Container objects: packages, worlds, levels
#[derive(Debug, Default)]
pub struct TestContainer {
    pub pre_edit_undo_calls: usize,
    pub post_edit_undo_calls: usize,
}

impl SyncObject for TestContainer {
    fn properties(&self) -> &[PropertyDescriptor] {
        &[]
    }

    fn serialize_property(&self, _property: &Name, _writer: &mut SyncObjectWriter<'_>) {}

    fn deserialize_property(
        &mut self,
        _property: &Name,
        _reader: &mut SyncObjectReader<'_, '_>,
    ) -> Result<(), SerdeErr> {
        Ok(())
    }

    fn pre_edit_undo(&mut self) {
        self.pre_edit_undo_calls += 1;
    }

    fn post_edit_undo(&mut self, _annotation: Option<&Rc<dyn TransactionAnnotation>>) {
        self.post_edit_undo_calls += 1;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

const LIGHT_PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::new("Intensity", PropertyFlags::empty()),
    PropertyDescriptor::new("Color", PropertyFlags::empty()),
    PropertyDescriptor::new("Target", PropertyFlags::empty()),
    PropertyDescriptor::new("Profile", PropertyFlags::empty()),
    PropertyDescriptor::new("CachedBrightness", PropertyFlags::TRANSIENT),
    PropertyDescriptor::new("EditorNote", PropertyFlags::EDITOR_ONLY),
];

/// A light with a handful of property kinds, and a counter for every hook
/// remote apply calls
#[derive(Debug, Default)]
pub struct TestLight {
    pub intensity: f32,
    pub color: u32,
    /// Another object in the world
    pub target: ObjectRef,
    /// An asset on disk
    pub profile: ObjectRef,
    pub cached_brightness: f32,
    pub editor_note: String,
    /// Not a property; travels with whole-object updates only
    pub native_revision: u32,

    pub pre_edit_undo_calls: usize,
    pub post_edit_undo_calls: usize,
    pub pre_edit_change_calls: usize,
    pub post_edit_change_calls: usize,
    pub restored_annotation: Option<String>,
}

impl TestLight {
    pub fn with_intensity(intensity: f32) -> Self {
        Self {
            intensity,
            ..Self::default()
        }
    }
}

impl SyncObject for TestLight {
    fn properties(&self) -> &[PropertyDescriptor] {
        LIGHT_PROPERTIES
    }

    fn serialize_property(&self, property: &Name, writer: &mut SyncObjectWriter<'_>) {
        match property.plain_str() {
            "Intensity" => self.intensity.ser(writer),
            "Color" => self.color.ser(writer),
            "Target" => writer.write_object_ref(&self.target),
            "Profile" => writer.write_object_ref(&self.profile),
            "CachedBrightness" => self.cached_brightness.ser(writer),
            "EditorNote" => self.editor_note.ser(writer),
            _ => {}
        }
    }

    fn deserialize_property(
        &mut self,
        property: &Name,
        reader: &mut SyncObjectReader<'_, '_>,
    ) -> Result<(), SerdeErr> {
        match property.plain_str() {
            "Intensity" => self.intensity = f32::de(reader)?,
            "Color" => self.color = u32::de(reader)?,
            "Target" => reader.read_object_ref(&mut self.target)?,
            "Profile" => reader.read_object_ref(&mut self.profile)?,
            "CachedBrightness" => self.cached_brightness = f32::de(reader)?,
            "EditorNote" => self.editor_note = String::de(reader)?,
            _ => {}
        }
        Ok(())
    }

    fn serialize_native(&self, writer: &mut SyncObjectWriter<'_>) {
        self.native_revision.ser(writer);
    }

    fn deserialize_native(&mut self, reader: &mut SyncObjectReader<'_, '_>) -> Result<(), SerdeErr> {
        if reader.remaining() > 0 {
            self.native_revision = u32::de(reader)?;
        }
        Ok(())
    }

    fn restore_annotation(
        &mut self,
        reader: &mut SyncObjectReader<'_, '_>,
    ) -> Option<Rc<dyn TransactionAnnotation>> {
        let note = String::de(reader).ok()?;
        self.restored_annotation = Some(note.clone());
        Some(Rc::new(LightAnnotation::new(&note)))
    }

    fn pre_edit_undo(&mut self) {
        self.pre_edit_undo_calls += 1;
    }

    fn post_edit_undo(&mut self, _annotation: Option<&Rc<dyn TransactionAnnotation>>) {
        self.post_edit_undo_calls += 1;
    }

    fn pre_edit_change(&mut self, _property: &Name) {
        self.pre_edit_change_calls += 1;
    }

    fn post_edit_change(&mut self) {
        self.post_edit_change_calls += 1;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Extra state a light attaches to its transaction record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightAnnotation {
    pub note: String,
}

impl LightAnnotation {
    pub fn new(note: &str) -> Self {
        Self {
            note: note.to_string(),
        }
    }
}

impl TransactionAnnotation for LightAnnotation {
    fn serialize(&self, writer: &mut SyncObjectWriter<'_>) {
        self.note.ser(writer);
    }
}
