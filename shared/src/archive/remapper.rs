/// Rewrites object paths from one world instance to another, e.g. from a
/// local play-in-editor copy to the world every peer shares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldRemapper {
    source_world_path: String,
    dest_world_path: String,
}

impl WorldRemapper {
    pub fn new(source_world_path: impl Into<String>, dest_world_path: impl Into<String>) -> Self {
        Self {
            source_world_path: source_world_path.into(),
            dest_world_path: dest_world_path.into(),
        }
    }

    pub fn has_mapping(&self) -> bool {
        !self.source_world_path.is_empty() && !self.dest_world_path.is_empty()
    }

    pub fn remap_object_path(&self, path: &str) -> String {
        if self.has_mapping() {
            if let Some(rest) = path.strip_prefix(self.source_world_path.as_str()) {
                return format!("{}{}", self.dest_world_path, rest);
            }
        }
        path.to_string()
    }

    /// Whether `path` lives in either remapped world. Objects there are
    /// expected to exist already and must not be loaded.
    pub fn has_matching_world(&self, path: &str) -> bool {
        self.has_mapping()
            && (path.starts_with(self.source_world_path.as_str())
                || path.starts_with(self.dest_world_path.as_str()))
    }
}
