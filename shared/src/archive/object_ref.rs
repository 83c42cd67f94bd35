/// Path written in place of an asset reference when assets are skipped.
pub const SKIPPED_ASSET_MARKER: &str = "__TANDEM_SKIPPED_ASSET__";

/// A property value that points at another object, by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ObjectRef {
    #[default]
    Null,
    /// An object that lives inside the edited world or package
    Object(String),
    /// A persistent asset that should never be duplicated by sync
    Asset(String),
}

impl ObjectRef {
    pub fn object(path: impl Into<String>) -> Self {
        Self::Object(path.into())
    }

    pub fn asset(path: impl Into<String>) -> Self {
        Self::Asset(path.into())
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            ObjectRef::Null => None,
            ObjectRef::Object(path) | ObjectRef::Asset(path) => Some(path),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ObjectRef::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum ObjectRefKind {
    Null = 0,
    Object = 1,
    Asset = 2,
}

impl ObjectRefKind {
    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Null),
            1 => Some(Self::Object),
            2 => Some(Self::Asset),
            _ => None,
        }
    }

    pub(crate) fn tag(self) -> u8 {
        self as u8
    }
}
