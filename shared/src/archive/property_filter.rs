use tandem_serde::Name;

use crate::object::PropertyDescriptor;

/// Decides which properties a [`SyncObjectWriter`](super::SyncObjectWriter)
/// visits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    /// Transient properties that should sync anyway
    pub allowed_transient_properties: Vec<Name>,
    pub include_editor_only: bool,
}

impl PropertyFilter {
    pub fn new(allowed_transient_properties: Vec<Name>, include_editor_only: bool) -> Self {
        Self {
            allowed_transient_properties,
            include_editor_only,
        }
    }

    /// `allow_list` restricts the walk to the named top-level properties.
    pub fn should_skip(&self, property: &PropertyDescriptor, allow_list: Option<&[Name]>) -> bool {
        if let Some(allow_list) = allow_list {
            if !allow_list.iter().any(|name| property.matches(name)) {
                return true;
            }
        }
        if property.is_editor_only() && !self.include_editor_only {
            return true;
        }
        property.is_transient()
            && !self
                .allowed_transient_properties
                .iter()
                .any(|name| property.matches(name))
    }
}
