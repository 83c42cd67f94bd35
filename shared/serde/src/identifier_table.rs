use std::{collections::HashMap, sync::Arc};

use crate::name::Name;

/// The flat, ordered list of base strings that reconstructs a
/// [`LocalIdentifierTable`]; position in the list is the identifier index.
pub type LocalIdentifierState = Vec<String>;

/// Bidirectional mapping between plain names and small integer indices,
/// scoped to one serialized payload.
///
/// Names are compared by their base string only: `Cube_0` and `Cube_7` map to
/// the same index, and the instance number travels separately on the wire.
/// Indices are assigned in insertion order and never change for the lifetime
/// of the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalIdentifierTable {
    names: Vec<Name>,
    lookup: HashMap<Arc<str>, u32>,
}

impl LocalIdentifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a table from state captured with [`Self::state`].
    pub fn from_state(state: &[String]) -> Self {
        let mut table = Self::new();
        table.set_state(state);
        table
    }

    /// Returns the index for the plain form of `name`, appending it if unseen.
    pub fn map_name(&mut self, name: &Name) -> u32 {
        if let Some(index) = self.lookup.get(name.plain_str()) {
            return *index;
        }
        let index = self.names.len() as u32;
        let plain = name.to_plain();
        self.lookup.insert(Arc::from(plain.plain_str()), index);
        self.names.push(plain);
        index
    }

    /// The name stored at `index`, always without an instance number.
    pub fn unmap_name(&self, index: u32) -> Option<Name> {
        self.names.get(index as usize).cloned()
    }

    pub fn has_index(&self, index: u32) -> bool {
        (index as usize) < self.names.len()
    }

    /// The index already assigned to the plain form of `name`, if any.
    pub fn find_index(&self, name: &Name) -> Option<u32> {
        self.lookup.get(name.plain_str()).copied()
    }

    pub fn has_name(&self, name: &Name) -> bool {
        self.lookup.contains_key(name.plain_str())
    }

    /// Replaces every entry with the given ordered list of base strings.
    pub fn set_state(&mut self, state: &[String]) {
        self.names.clear();
        self.lookup.clear();
        self.names.reserve(state.len());
        for (index, text) in state.iter().enumerate() {
            let index = index as u32;
            self.names.push(Name::with_number(text, 0));
            // a duplicated entry keeps resolving by index, lookups find the first one
            self.lookup.entry(Arc::from(text.as_str())).or_insert(index);
        }
    }

    /// The ordered list of base strings, suitable for [`Self::set_state`].
    pub fn state(&self) -> LocalIdentifierState {
        self.names
            .iter()
            .map(|name| name.plain_str().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
        self.lookup.clear();
    }
}
