mod error;
mod flags;
mod object_id;
mod path;
mod sync_object;
mod world;

pub use error::ObjectPathError;
pub use flags::{ObjectFlags, PropertyFlags};
pub use object_id::ObjectId;
pub use path::{
    is_valid_long_package_name, join_path, object_path_depth, outer_chain, outermost,
    package_name_of, root_properties, MAX_OUTER_CHAIN_DEPTH, TRANSIENT_PACKAGE_NAME,
};
pub use sync_object::{
    exported_property, find_property, PropertyDescriptor, SyncObject, TransactionAnnotation,
};
pub use world::{
    ObjectKey, ObjectNotification, ObjectTransactedEvent, ObjectTransactedKind, ObjectWorld,
    PropertyChangeType, TransactionContext, TransactionState, UndoHistory,
};

use tandem_serde::Name;

/// Builds the [`ObjectId`] of a live object from its current class, outer,
/// name and flags.
pub fn object_id_of(world: &dyn ObjectWorld, object: ObjectKey) -> Option<ObjectId> {
    let class_path_name = world.class_path_name(object)?;
    let object_name = world.object_name(object)?;
    let outer_path_name = match world.outer(object) {
        Some(outer) => Name::new(&world.path_name(outer)?),
        None => Name::none(),
    };
    Some(ObjectId::new(
        class_path_name,
        outer_path_name,
        object_name,
        world.flags(object),
    ))
}
