use std::{
    fmt::{Debug, Display, Formatter},
    sync::Arc,
};

/// Names known to both ends of a session without negotiation.
///
/// The position of a name in this list is its hardcoded index, so entries may
/// only ever be appended.
pub const HARDCODED_NAMES: &[&str] = &[
    "None",
    "ByteProperty",
    "IntProperty",
    "BoolProperty",
    "FloatProperty",
    "ObjectProperty",
    "NameProperty",
    "DelegateProperty",
    "DoubleProperty",
    "ArrayProperty",
    "StructProperty",
    "VectorProperty",
    "RotatorProperty",
    "StrProperty",
    "TextProperty",
    "InterfaceProperty",
    "MapProperty",
    "SetProperty",
    "EnumProperty",
    "Core",
    "Engine",
    "Editor",
    "CoreUObject",
    "Vector2D",
    "IntPoint",
    "Vector4",
    "Name",
    "Vector",
    "Rotator",
    "Color",
    "Plane",
    "Matrix",
    "LinearColor",
    "Quat",
    "Transform",
    "Box",
    "Sphere",
    "Object",
    "Class",
    "Package",
    "World",
    "Level",
    "Actor",
    "Pawn",
    "Camera",
    "Light",
    "RelativeLocation",
    "RelativeRotation",
    "RelativeScale3D",
];

/// Hardcoded indices are always strictly below this value.
pub const MAX_NETWORKED_HARDCODED_NAME: u32 = HARDCODED_NAMES.len() as u32;

const NONE_TEXT: &str = "None";

/// A symbolic name: a base string plus an instance number.
///
/// The instance number is orthogonal to the base string: `number == 0` means
/// "no suffix", and any other value displays as `_{number - 1}`, so
/// `Name::new("Cube_0")` has base `"Cube"` and number `1`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name {
    text: Arc<str>,
    number: u32,
}

impl Name {
    /// Parses a display string, splitting a trailing `_<digits>` suffix into
    /// the instance number. Digits with a leading zero stay part of the text.
    pub fn new(value: &str) -> Self {
        if value.is_empty() {
            return Self::none();
        }
        match split_number(value) {
            Some((text, number)) => Self::with_number(text, number),
            None => Self::with_number(value, 0),
        }
    }

    /// Builds a name from an already-split base string and instance number.
    pub fn with_number(text: &str, number: u32) -> Self {
        Self {
            text: Arc::from(text),
            number,
        }
    }

    pub fn none() -> Self {
        Self::with_number(NONE_TEXT, 0)
    }

    pub fn is_none(&self) -> bool {
        self.number == 0 && &*self.text == NONE_TEXT
    }

    /// The base string, without any instance number.
    pub fn plain_str(&self) -> &str {
        &self.text
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// This name with its instance number stripped.
    pub fn to_plain(&self) -> Self {
        Self {
            text: self.text.clone(),
            number: 0,
        }
    }

    /// This name's base string with the given instance number applied.
    pub fn with_instance_number(&self, number: u32) -> Self {
        Self {
            text: self.text.clone(),
            number,
        }
    }

    /// Whether both names share the same base string, ignoring instance numbers.
    pub fn plain_eq(&self, other: &Name) -> bool {
        self.text == other.text
    }

    /// Index of this name's base string in [`HARDCODED_NAMES`], if present.
    pub fn hardcoded_index(&self) -> Option<u32> {
        HARDCODED_NAMES
            .iter()
            .position(|hardcoded| *hardcoded == &*self.text)
            .map(|index| index as u32)
    }

    /// The hardcoded name at `index`, with no instance number.
    pub fn from_hardcoded_index(index: u32) -> Option<Self> {
        HARDCODED_NAMES
            .get(index as usize)
            .map(|text| Self::with_number(text, 0))
    }
}

fn split_number(value: &str) -> Option<(&str, u32)> {
    let underscore = value.rfind('_')?;
    let (text, digits) = (&value[..underscore], &value[underscore + 1..]);
    if text.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    let suffix: u32 = digits.parse().ok()?;
    let number = suffix.checked_add(1)?;
    Some((text, number))
}

impl Default for Name {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.number == 0 {
            write!(f, "{}", self.text)
        } else {
            write!(f, "{}_{}", self.text, self.number - 1)
        }
    }
}

impl Debug for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Name({})", self)
    }
}
