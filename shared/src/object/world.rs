use std::rc::Rc;

use tandem_serde::Name;

use crate::types::{OperationId, TransactionId};

use super::{ObjectFlags, SyncObject, TransactionAnnotation};

/// Opaque handle to a live object in an [`ObjectWorld`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct ObjectKey(u64);

impl ObjectKey {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

/// Describes one transaction as the host's undo system sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionContext {
    pub transaction_id: TransactionId,
    pub operation_id: OperationId,
    pub title: String,
    pub primary_object: Option<ObjectKey>,
}

impl TransactionContext {
    pub fn new(transaction_id: TransactionId, operation_id: OperationId) -> Self {
        Self {
            transaction_id,
            operation_id,
            title: String::new(),
            primary_object: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_primary_object(mut self, primary_object: ObjectKey) -> Self {
        self.primary_object = Some(primary_object);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    TransactionStarted,
    TransactionCanceled,
    TransactionFinalized,
    UndoRedoStarted,
    UndoRedoFinalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectTransactedKind {
    /// The object was restored by an undo or redo
    UndoRedo,
    /// The transaction that touched the object was committed
    Finalized,
    /// An interim view of an edit still in progress
    Snapshot,
}

impl ObjectTransactedKind {
    pub fn is_snapshot(&self) -> bool {
        matches!(self, ObjectTransactedKind::Snapshot)
    }
}

/// What changed on one object within a transaction.
#[derive(Debug, Clone)]
pub struct ObjectTransactedEvent {
    pub transaction_id: TransactionId,
    pub operation_id: OperationId,
    pub kind: ObjectTransactedKind,
    /// The object's name before this change
    pub original_object_name: Name,
    /// The object's outer path before this change
    pub original_outer_path_name: Name,
    pub has_name_change: bool,
    pub has_outer_change: bool,
    pub has_pending_kill_change: bool,
    pub has_non_property_changes: bool,
    /// Dotted paths of every changed property
    pub changed_properties: Vec<String>,
    pub annotation: Option<Rc<dyn TransactionAnnotation>>,
}

impl ObjectTransactedEvent {
    pub fn new(
        context: &TransactionContext,
        kind: ObjectTransactedKind,
        original_outer_path_name: Name,
        original_object_name: Name,
    ) -> Self {
        Self {
            transaction_id: context.transaction_id,
            operation_id: context.operation_id,
            kind,
            original_object_name,
            original_outer_path_name,
            has_name_change: false,
            has_outer_change: false,
            has_pending_kill_change: false,
            has_non_property_changes: false,
            changed_properties: Vec::new(),
            annotation: None,
        }
    }

    pub fn has_property_changes(&self) -> bool {
        !self.changed_properties.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyChangeType {
    /// A drag or other continuous edit still in progress
    Interactive,
    Unspecified,
}

/// Broadcast by remote apply so the rest of the host can react as if the
/// change had been made locally.
#[derive(Debug, Clone)]
pub enum ObjectNotification {
    BeforeUndoRedo {
        context: TransactionContext,
    },
    AfterUndoRedo {
        context: TransactionContext,
        succeeded: bool,
    },
    PreObjectPropertyChanged {
        object: ObjectKey,
        property: Name,
    },
    ObjectPropertyChanged {
        object: ObjectKey,
        property: Name,
        change_type: PropertyChangeType,
    },
    ObjectTransacted {
        object: ObjectKey,
        event: ObjectTransactedEvent,
    },
}

/// The host's linear undo buffer.
pub trait UndoHistory {
    /// Position of `transaction_id` in the buffer, oldest first.
    fn find_transaction_index(&self, transaction_id: &TransactionId) -> Option<usize>;

    fn queue_length(&self) -> usize;

    /// How many transactions at the end of the buffer are currently undone.
    fn undo_count(&self) -> usize;

    fn undo(&mut self) -> bool;

    fn redo(&mut self) -> bool;

    /// Closes the transaction currently being recorded.
    fn end_current(&mut self);

    /// Returns the previous value.
    fn set_squelch_notifications(&mut self, squelch: bool) -> bool;
}

/// The host object system that remote transactions are applied against.
pub trait ObjectWorld {
    /// Exact-class lookup of `object_name` inside the object at `outer_path_name`.
    /// A `None` outer looks up a root package.
    fn find_object(
        &self,
        outer_path_name: &Name,
        object_name: &Name,
        class_path_name: &Name,
    ) -> Option<ObjectKey>;

    fn find_object_by_path(&self, path: &str) -> Option<ObjectKey>;

    /// Brings the object at `path` into memory if it can be found on disk.
    fn load_object(&mut self, path: &str) -> Option<ObjectKey>;

    fn construct_object(
        &mut self,
        class_path_name: &Name,
        outer: ObjectKey,
        object_name: &Name,
        flags: ObjectFlags,
    ) -> Option<ObjectKey>;

    /// Creates an actor without running its construction; the caller must
    /// call [`finish_spawning`](ObjectWorld::finish_spawning) once its state
    /// has been applied.
    fn spawn_actor_deferred(
        &mut self,
        class_path_name: &Name,
        level: ObjectKey,
        object_name: &Name,
        flags: ObjectFlags,
    ) -> Option<ObjectKey>;

    fn finish_spawning(&mut self, actor: ObjectKey);

    fn is_actor_class(&self, class_path_name: &Name) -> bool;

    /// The level an actor created inside `outer` would belong to.
    fn owning_level(&self, outer: ObjectKey) -> Option<ObjectKey>;

    /// Renames `object`, moving it under `new_outer` when given.
    fn rename_object(
        &mut self,
        object: ObjectKey,
        new_name: &Name,
        new_outer: Option<ObjectKey>,
    ) -> bool;

    fn object_name(&self, object: ObjectKey) -> Option<Name>;

    fn class_path_name(&self, object: ObjectKey) -> Option<Name>;

    fn outer(&self, object: ObjectKey) -> Option<ObjectKey>;

    fn path_name(&self, object: ObjectKey) -> Option<String>;

    fn flags(&self, object: ObjectKey) -> ObjectFlags;

    fn set_flags(&mut self, object: ObjectKey, flags: ObjectFlags);

    fn is_pending_kill(&self, object: ObjectKey) -> bool;

    fn set_pending_kill(&mut self, object: ObjectKey, pending_kill: bool);

    /// Whether `object`'s class is `class_path_name` or derives from it.
    fn is_a(&self, object: ObjectKey, class_path_name: &Name) -> bool;

    fn object(&self, object: ObjectKey) -> Option<&dyn SyncObject>;

    fn object_mut(&mut self, object: ObjectKey) -> Option<&mut dyn SyncObject>;

    fn broadcast(&mut self, notification: ObjectNotification);

    fn collect_garbage(&mut self);

    /// False while a modal interaction, save or garbage collection is in
    /// flight.
    fn can_perform_blocking_action(&self) -> bool {
        true
    }

    /// The transaction currently being recorded, if any.
    fn current_transaction(&self) -> Option<TransactionContext> {
        None
    }

    fn undo_history(&mut self) -> Option<&mut dyn UndoHistory> {
        None
    }
}
