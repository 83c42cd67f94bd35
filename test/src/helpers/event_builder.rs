use tandem_shared::{
    ExportedObject, LocalIdentifierTable, Name, ObjectFlags, ObjectId, ObjectKey,
    ObjectTransactedEvent, ObjectTransactedKind, ObjectWorld, SerializedPropertyData,
    TransactionContext, TransactionEventBase, TransactionFinalizedEvent, TransactionSnapshotEvent,
    Uuid,
};

use crate::{test_protocol::LIGHT_CLASS, TestWorld};

/// Fluent builder for exported object updates
pub struct ExportedObjectBuilder {
    update: ExportedObject,
}

impl ExportedObjectBuilder {
    pub fn new(class_path_name: &str, outer_path_name: &str, object_name: &str) -> Self {
        let object_id = ObjectId::new(
            Name::new(class_path_name),
            Name::new(outer_path_name),
            Name::new(object_name),
            ObjectFlags::TRANSACTIONAL,
        );
        let segments = outer_path_name.split(|c: char| c == '.' || c == ':').count();
        let depth = u32::try_from(segments).unwrap_or(0) + 1;
        Self {
            update: ExportedObject::new(object_id, depth),
        }
    }

    pub fn light(outer_path_name: &str, object_name: &str) -> Self {
        Self::new(LIGHT_CLASS, outer_path_name, object_name)
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.update.object_path_depth = depth;
        self
    }

    pub fn renamed_to(mut self, new_name: &str) -> Self {
        self.update.object_data.new_name = Name::new(new_name);
        self
    }

    pub fn moved_to(mut self, new_outer_path_name: &str) -> Self {
        self.update.object_data.new_outer_path_name = Name::new(new_outer_path_name);
        self
    }

    pub fn allow_create(mut self) -> Self {
        self.update.object_data.allow_create = true;
        self
    }

    pub fn pending_kill(mut self, is_pending_kill: bool) -> Self {
        self.update.object_data.is_pending_kill = is_pending_kill;
        self
    }

    pub fn whole_object(mut self, serialized_data: Vec<u8>) -> Self {
        self.update.object_data.serialized_data = serialized_data;
        self
    }

    pub fn property(mut self, property_name: &str, serialized_data: Vec<u8>) -> Self {
        self.update
            .property_datas
            .push(SerializedPropertyData::new(Name::new(property_name), serialized_data));
        self
    }

    pub fn annotation(mut self, serialized_annotation_data: Vec<u8>) -> Self {
        self.update.serialized_annotation_data = serialized_annotation_data;
        self
    }

    pub fn build(self) -> ExportedObject {
        self.update
    }
}

pub fn event_base(endpoint_id: Uuid, exported_objects: Vec<ExportedObject>) -> TransactionEventBase {
    TransactionEventBase {
        transaction_id: Uuid::new_v4(),
        operation_id: Uuid::new_v4(),
        transaction_endpoint_id: endpoint_id,
        transaction_update_index: 0,
        modified_packages: vec![Name::new("/Game/Level")],
        primary_object_id: ObjectId::none(),
        exported_objects,
    }
}

pub fn finalized_event(
    endpoint_id: Uuid,
    exported_objects: Vec<ExportedObject>,
    table: &LocalIdentifierTable,
) -> TransactionFinalizedEvent {
    TransactionFinalizedEvent {
        base: event_base(endpoint_id, exported_objects),
        local_identifier_state: table.state(),
        title: "Remote Edit".to_string(),
    }
}

pub fn snapshot_event(
    endpoint_id: Uuid,
    exported_objects: Vec<ExportedObject>,
) -> TransactionSnapshotEvent {
    TransactionSnapshotEvent {
        base: event_base(endpoint_id, exported_objects),
    }
}

/// What the host reports after changing `properties` of `object` locally.
/// The object's current name and outer are used as the original ones.
pub fn local_change(
    context: &TransactionContext,
    kind: ObjectTransactedKind,
    world: &TestWorld,
    object: ObjectKey,
    properties: &[&str],
) -> ObjectTransactedEvent {
    let outer_path_name = world
        .outer(object)
        .and_then(|outer| world.path_name(outer))
        .map(|path| Name::new(&path))
        .unwrap_or_default();
    let object_name = world.object_name(object).unwrap_or_default();
    let mut event = ObjectTransactedEvent::new(context, kind, outer_path_name, object_name);
    event.changed_properties = properties.iter().map(|property| property.to_string()).collect();
    event
}

pub fn new_context() -> TransactionContext {
    TransactionContext::new(Uuid::new_v4(), Uuid::new_v4())
}
