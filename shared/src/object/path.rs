use tandem_serde::Name;

use super::{ObjectKey, ObjectPathError, ObjectWorld};

/// Package holding objects that are never synced.
pub const TRANSIENT_PACKAGE_NAME: &str = "/Engine/Transient";

/// Outer chains longer than this are treated as cyclic.
pub const MAX_OUTER_CHAIN_DEPTH: usize = 64;

const INVALID_LONG_PACKAGE_CHARACTERS: &str = "\\:*?\"<>|' ,.&!~\n\r\t@#";

/// Appends `object_name` to `outer_path` with the delimiter the object path
/// grammar expects: `.` below a package, `:` below a top-level object, `.`
/// below anything deeper.
pub fn join_path(outer_path: &str, object_name: &str) -> String {
    let delimiter = if outer_path.contains(':') {
        '.'
    } else if outer_path.contains('.') {
        ':'
    } else {
        '.'
    };
    format!("{}{}{}", outer_path, delimiter, object_name)
}

/// The package part of an object path: everything before the first `.` or
/// `:`.
///
/// ```
/// # use tandem_shared::package_name_of;
/// assert_eq!(package_name_of("/Game/Level.Level:PersistentLevel.Cube"), "/Game/Level");
/// assert_eq!(package_name_of("/Game/Level"), "/Game/Level");
/// ```
pub fn package_name_of(object_path: &str) -> &str {
    match object_path.find(|c: char| c == '.' || c == ':') {
        Some(index) => &object_path[..index],
        None => object_path,
    }
}

/// Whether `name` looks like a persistent long package name:
/// `/<Root>/<Path>` with no empty segments and no reserved characters.
pub fn is_valid_long_package_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix('/') else {
        return false;
    };
    if rest.ends_with('/') || rest.contains("//") {
        return false;
    }
    if rest.chars().any(|c| INVALID_LONG_PACKAGE_CHARACTERS.contains(c)) {
        return false;
    }
    let mut segments = rest.split('/');
    let has_root = segments.next().is_some_and(|root| !root.is_empty());
    let has_path = segments.next().is_some_and(|path| !path.is_empty());
    has_root && has_path
}

/// The ancestors of `object`, innermost first, bounded by
/// [`MAX_OUTER_CHAIN_DEPTH`].
pub fn outer_chain(
    world: &dyn ObjectWorld,
    object: ObjectKey,
) -> Result<Vec<ObjectKey>, ObjectPathError> {
    let mut chain = Vec::new();
    let mut current = world.outer(object);
    while let Some(outer) = current {
        if chain.len() >= MAX_OUTER_CHAIN_DEPTH {
            return Err(ObjectPathError::OuterChainTooDeep {
                path: world.path_name(object).unwrap_or_default(),
                limit: MAX_OUTER_CHAIN_DEPTH,
            });
        }
        chain.push(outer);
        current = world.outer(outer);
    }
    Ok(chain)
}

/// Number of objects from `object` up to and including its root package.
///
/// Outers always have a smaller depth than the objects inside them, which
/// is what remote apply sorts on.
pub fn object_path_depth(
    world: &dyn ObjectWorld,
    object: ObjectKey,
) -> Result<u32, ObjectPathError> {
    let ancestors = outer_chain(world, object)?.len();
    Ok(u32::try_from(ancestors + 1).unwrap_or(u32::MAX))
}

/// The outermost object of `object`'s chain (itself if it has no outer).
pub fn outermost(
    world: &dyn ObjectWorld,
    object: ObjectKey,
) -> Result<ObjectKey, ObjectPathError> {
    Ok(outer_chain(world, object)?.last().copied().unwrap_or(object))
}

/// Top-level property names touched by a list of dotted property paths,
/// deduplicated in encounter order.
///
/// ```
/// # use tandem_shared::root_properties;
/// let roots = root_properties(&["Transform.Location.X", "Intensity", "Transform.Rotation"]);
/// let roots: Vec<String> = roots.iter().map(|name| name.to_string()).collect();
/// assert_eq!(roots, vec!["Transform", "Intensity"]);
/// ```
pub fn root_properties<S: AsRef<str>>(changed_property_paths: &[S]) -> Vec<Name> {
    let mut roots: Vec<Name> = Vec::new();
    for path in changed_property_paths {
        let path = path.as_ref();
        let root = path.split('.').next().unwrap_or(path);
        if root.is_empty() {
            continue;
        }
        let name = Name::new(root);
        if !roots.contains(&name) {
            roots.push(name);
        }
    }
    roots
}
