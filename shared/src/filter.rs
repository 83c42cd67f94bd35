use tandem_serde::Name;

use crate::{
    config::SyncConfig,
    object::{
        is_valid_long_package_name, outer_chain, ObjectFlags, ObjectKey, ObjectWorld,
        TRANSIENT_PACKAGE_NAME,
    },
};

/// Matches objects of a class, optionally only when some outer is of
/// another class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionClassFilter {
    pub object_class: Name,
    pub object_outer_class: Option<Name>,
}

impl TransactionClassFilter {
    pub fn new(object_class: impl Into<Name>) -> Self {
        Self {
            object_class: object_class.into(),
            object_outer_class: None,
        }
    }

    pub fn with_outer_class(mut self, object_outer_class: impl Into<Name>) -> Self {
        self.object_outer_class = Some(object_outer_class.into());
        self
    }

    pub fn matches(&self, world: &dyn ObjectWorld, object: ObjectKey) -> bool {
        if !world.is_a(object, &self.object_class) {
            return false;
        }
        let Some(outer_class) = &self.object_outer_class else {
            return true;
        };
        // a chain too deep to walk can't be trusted to match
        match outer_chain(world, object) {
            Ok(outers) => outers.into_iter().any(|outer| world.is_a(outer, outer_class)),
            Err(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionFilterResult {
    IncludeObject,
    /// Leave this object out of the transaction
    ExcludeObject,
    /// Leave the whole transaction out
    ExcludeTransaction,
}

fn any_filter_matches(
    filters: &[TransactionClassFilter],
    world: &dyn ObjectWorld,
    object: ObjectKey,
) -> bool {
    filters.iter().any(|filter| filter.matches(world, object))
}

/// Decides whether a change to `object`, living in `package`, may be synced.
pub fn classify_object(
    world: &dyn ObjectWorld,
    object: ObjectKey,
    package: Option<ObjectKey>,
    config: &SyncConfig,
) -> TransactionFilterResult {
    let Some(package) = package else {
        return TransactionFilterResult::ExcludeObject;
    };
    let package_name = world.path_name(package).unwrap_or_default();
    if package_name == TRANSIENT_PACKAGE_NAME
        || world.flags(package).contains(ObjectFlags::TRANSIENT)
        || world.flags(object).contains(ObjectFlags::TRANSIENT)
    {
        return TransactionFilterResult::ExcludeObject;
    }

    if !is_valid_long_package_name(&package_name) {
        return TransactionFilterResult::ExcludeObject;
    }

    if any_filter_matches(&config.exclude_transaction_class_filters, world, object) {
        return TransactionFilterResult::ExcludeTransaction;
    }

    if config.include_object_class_filters.is_empty()
        || any_filter_matches(&config.include_object_class_filters, world, object)
    {
        return TransactionFilterResult::IncludeObject;
    }

    TransactionFilterResult::ExcludeObject
}
