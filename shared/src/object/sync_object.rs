use std::{any::Any, fmt::Debug, rc::Rc};

use tandem_serde::{Name, SerdeErr};

use crate::archive::{SyncObjectReader, SyncObjectWriter};

use super::PropertyFlags;

/// One entry of a synced type's property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub flags: PropertyFlags,
}

impl PropertyDescriptor {
    pub const fn new(name: &'static str, flags: PropertyFlags) -> Self {
        Self { name, flags }
    }

    pub fn name(&self) -> Name {
        Name::new(self.name)
    }

    pub fn matches(&self, name: &Name) -> bool {
        name.number() == 0 && name.plain_str() == self.name
    }

    pub fn is_transient(&self) -> bool {
        self.flags.contains(PropertyFlags::TRANSIENT)
    }

    pub fn is_editor_only(&self) -> bool {
        self.flags.contains(PropertyFlags::EDITOR_ONLY)
    }
}

/// Opaque data a subsystem attaches to an object's transaction record and
/// wants back when the transaction is replayed.
pub trait TransactionAnnotation: Debug {
    fn serialize(&self, writer: &mut SyncObjectWriter<'_>);
}

/// A live object whose state can be captured and replayed.
///
/// Implementors describe their own properties instead of relying on runtime
/// reflection: [`properties`](SyncObject::properties) lists what exists and
/// the (de)serialize hooks move one property at a time.
pub trait SyncObject: Any {
    fn properties(&self) -> &[PropertyDescriptor];

    /// Writes the current value of `property`. Called only for names listed
    /// by [`properties`](SyncObject::properties).
    fn serialize_property(&self, property: &Name, writer: &mut SyncObjectWriter<'_>);

    fn deserialize_property(
        &mut self,
        property: &Name,
        reader: &mut SyncObjectReader<'_, '_>,
    ) -> Result<(), SerdeErr>;

    /// State that does not live in a property. Whatever is written here must
    /// be read back by [`deserialize_native`](SyncObject::deserialize_native).
    fn serialize_native(&self, _writer: &mut SyncObjectWriter<'_>) {}

    fn deserialize_native(&mut self, _reader: &mut SyncObjectReader<'_, '_>) -> Result<(), SerdeErr> {
        Ok(())
    }

    /// Rebuilds an annotation written by [`TransactionAnnotation::serialize`].
    fn restore_annotation(
        &mut self,
        _reader: &mut SyncObjectReader<'_, '_>,
    ) -> Option<Rc<dyn TransactionAnnotation>> {
        None
    }

    fn pre_edit_undo(&mut self) {}

    fn post_edit_undo(&mut self, _annotation: Option<&Rc<dyn TransactionAnnotation>>) {}

    fn pre_edit_change(&mut self, _property: &Name) {}

    fn post_edit_change(&mut self) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Looks up `name` in `object`'s property table.
pub fn find_property<'o>(object: &'o dyn SyncObject, name: &Name) -> Option<&'o PropertyDescriptor> {
    object
        .properties()
        .iter()
        .find(|descriptor| descriptor.matches(name))
}

/// Like [`find_property`], but also rejects editor-only properties when
/// `include_editor_only` is false.
pub fn exported_property<'o>(
    object: &'o dyn SyncObject,
    name: &Name,
    include_editor_only: bool,
) -> Option<&'o PropertyDescriptor> {
    find_property(object, name)
        .filter(|descriptor| include_editor_only || !descriptor.is_editor_only())
}
