use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use log::{error, trace};

use tandem_shared::{
    classify_object, find_property, object_id_of, object_path_depth, outermost,
    root_properties, transaction_scratchpad_key, ExportedObject, LocalIdentifierTable,
    MessageFlags, Name, ObjectId, ObjectKey, ObjectTransactedEvent, ObjectTransactedKind,
    ObjectWorld, OperationId, PropertyFilter, SerializedPropertyData, SessionEvent, SyncConfig,
    SyncObject, SyncObjectWriter, TransactionContext, TransactionEventBase,
    TransactionFilterResult, TransactionFinalizedEvent, TransactionId, TransactionSnapshotEvent,
    TransactionState, TransactionUpdateIndex,
};

use crate::session::ClientSession;

/// A local transaction that has not been fully sent yet.
#[derive(Debug)]
pub struct PendingTransactionToSend {
    pub transaction_id: TransactionId,
    pub operation_id: OperationId,
    pub primary_object: Option<ObjectKey>,
    pub is_finalized: bool,
    /// A filter excluded the whole transaction; nothing will be sent
    pub is_excluded: bool,
    pub title: String,
    pub modified_packages: Vec<Name>,
    pub finalized_object_updates: Vec<ExportedObject>,
    snapshot_object_updates: Vec<ExportedObject>,
    snapshot_index: HashMap<ObjectId, usize>,
    /// `None` until the first snapshot goes out
    pub last_snapshot_time: Option<Instant>,
    /// Names in the finalized updates are interned here
    pub finalized_identifier_table: LocalIdentifierTable,
    pub excluded_objects: Vec<ObjectId>,
}

impl PendingTransactionToSend {
    pub fn new(context: &TransactionContext) -> Self {
        Self {
            transaction_id: context.transaction_id,
            operation_id: context.operation_id,
            primary_object: context.primary_object,
            is_finalized: false,
            is_excluded: false,
            title: String::new(),
            modified_packages: Vec::new(),
            finalized_object_updates: Vec::new(),
            snapshot_object_updates: Vec::new(),
            snapshot_index: HashMap::new(),
            last_snapshot_time: None,
            finalized_identifier_table: LocalIdentifierTable::new(),
            excluded_objects: Vec::new(),
        }
    }

    /// Pending snapshot updates, one per object, in first-change order.
    pub fn snapshot_object_updates(&self) -> &[ExportedObject] {
        &self.snapshot_object_updates
    }

    pub fn snapshot_update(&self, object_id: &ObjectId) -> Option<&ExportedObject> {
        let index = self.snapshot_index.get(object_id)?;
        self.snapshot_object_updates.get(*index)
    }

    pub fn has_snapshot_updates(&self) -> bool {
        !self.snapshot_object_updates.is_empty()
    }

    fn snapshot_update_mut(
        &mut self,
        object_id: &ObjectId,
        create: impl FnOnce() -> ExportedObject,
    ) -> &mut ExportedObject {
        let index = match self.snapshot_index.get(object_id) {
            Some(index) => *index,
            None => {
                let index = self.snapshot_object_updates.len();
                self.snapshot_object_updates.push(create());
                self.snapshot_index.insert(object_id.clone(), index);
                index
            }
        };
        &mut self.snapshot_object_updates[index]
    }

    fn take_snapshot_updates(&mut self) -> Vec<ExportedObject> {
        self.snapshot_index.clear();
        std::mem::take(&mut self.snapshot_object_updates)
    }

    fn add_modified_package(&mut self, package_name: Name) {
        if !self.modified_packages.contains(&package_name) {
            self.modified_packages.push(package_name);
        }
    }
}

/// Collects local transactions as they happen and sends them once they are
/// finalized, plus throttled snapshots while they are still being edited.
#[derive(Debug, Default)]
pub struct PendingTransactionSender {
    pending: HashMap<OperationId, PendingTransactionToSend>,
    order: Vec<OperationId>,
}

impl PendingTransactionSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self, operation_id: &OperationId) -> Option<&PendingTransactionToSend> {
        self.pending.get(operation_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn handle_transaction_state_changed(
        &mut self,
        context: &TransactionContext,
        state: TransactionState,
    ) {
        trace!(
            "Transaction {} ({}): {:?}",
            context.transaction_id,
            context.operation_id,
            state
        );

        match state {
            TransactionState::TransactionStarted | TransactionState::UndoRedoStarted => {
                if self.pending.contains_key(&context.operation_id) {
                    debug_assert!(false, "operation {} started twice", context.operation_id);
                    error!(
                        "Ignoring duplicate start for operation {} of transaction {}",
                        context.operation_id, context.transaction_id
                    );
                    return;
                }
                self.order.push(context.operation_id);
                self.pending
                    .insert(context.operation_id, PendingTransactionToSend::new(context));
            }
            TransactionState::TransactionFinalized | TransactionState::UndoRedoFinalized => {
                let Some(pending) = self.pending_or_report(&context.operation_id) else {
                    return;
                };
                pending.primary_object = context.primary_object;
                pending.is_finalized = true;
                pending.title = context.title.clone();
            }
            TransactionState::TransactionCanceled => {
                let Some(pending) = self.pending_or_report(&context.operation_id) else {
                    return;
                };
                if pending.last_snapshot_time.is_none() {
                    // nothing reached the network; the order list skips missing records
                    self.pending.remove(&context.operation_id);
                } else {
                    // peers saw snapshots, so the restoring update has to go out
                    pending.primary_object = context.primary_object;
                    pending.is_finalized = true;
                }
            }
        }
    }

    pub fn handle_object_transacted(
        &mut self,
        world: &dyn ObjectWorld,
        object: ObjectKey,
        event: &ObjectTransactedEvent,
        config: &SyncConfig,
    ) {
        let package = outermost(world, object).ok();
        let filter_result = classify_object(world, object, package, config);
        let include_editor_only = config.include_editor_only_properties;

        trace!(
            "Transaction {} ({}, {:?}):{} {} ({} property changes, {} object changes)",
            event.transaction_id,
            event.operation_id,
            event.kind,
            if filter_result == TransactionFilterResult::ExcludeObject {
                " FILTERED OBJECT:"
            } else {
                ""
            },
            world.path_name(object).unwrap_or_default(),
            if event.has_property_changes() { "has" } else { "no" },
            if event.has_non_property_changes { "has" } else { "no" },
        );

        let object_id = ObjectId::new(
            world.class_path_name(object).unwrap_or_default(),
            event.original_outer_path_name.clone(),
            event.original_object_name.clone(),
            world.flags(object),
        );

        let Some(pending) = self.pending_or_report(&event.operation_id) else {
            return;
        };

        if filter_result != TransactionFilterResult::IncludeObject {
            pending.is_excluded |= filter_result == TransactionFilterResult::ExcludeTransaction;
            pending.excluded_objects.push(object_id);
            return;
        }

        let new_object_name = if event.has_name_change {
            world.object_name(object).unwrap_or_default()
        } else {
            Name::none()
        };
        let new_outer_path_name = match world.outer(object).and_then(|outer| world.path_name(outer)) {
            Some(outer_path) if event.has_outer_change => Name::new(&outer_path),
            _ => Name::none(),
        };
        let root_property_names = root_properties(&event.changed_properties);
        let path_depth = object_path_depth(world, object).unwrap_or(0);
        let is_pending_kill = world.is_pending_kill(object);
        let sync_object = world.object(object);
        let filter = PropertyFilter::new(
            config.allowed_transient_properties.clone(),
            include_editor_only,
        );

        if let Some(package_name) = package.and_then(|package| world.path_name(package)) {
            pending.add_modified_package(Name::new(&package_name));
        }

        if event.kind == ObjectTransactedKind::Snapshot {
            if !event.has_property_changes() && event.annotation.is_none() {
                return;
            }

            let update = pending.snapshot_update_mut(&object_id, || {
                let mut update = ExportedObject::new(object_id.clone(), path_depth);
                update.object_data.allow_create = false;
                update.object_data.is_pending_kill = is_pending_kill;
                update
            });

            if let Some(annotation) = &event.annotation {
                let mut writer = SyncObjectWriter::new(None, filter.clone(), true);
                annotation.serialize(&mut writer);
                update.serialized_annotation_data = writer.to_bytes();
            }

            let Some(sync_object) = sync_object else {
                return;
            };
            for root_property_name in &root_property_names {
                if !is_exported(sync_object, root_property_name, &filter) {
                    continue;
                }
                let serialized_data =
                    serialize_property(None, &filter, sync_object, root_property_name);
                match update.find_property_data_mut(root_property_name) {
                    Some(property_data) => property_data.serialized_data = serialized_data,
                    None => update.property_datas.push(SerializedPropertyData::new(
                        root_property_name.clone(),
                        serialized_data,
                    )),
                }
            }
        } else {
            let mut update = ExportedObject::new(object_id, path_depth);
            update.object_data.allow_create = event.has_pending_kill_change && !is_pending_kill;
            update.object_data.is_pending_kill = is_pending_kill;
            update.object_data.new_name = new_object_name;
            update.object_data.new_outer_path_name = new_outer_path_name;

            let table = &mut pending.finalized_identifier_table;

            if let Some(annotation) = &event.annotation {
                let mut writer = SyncObjectWriter::new(Some(&mut *table), filter.clone(), false);
                annotation.serialize(&mut writer);
                update.serialized_annotation_data = writer.to_bytes();
            }

            if let Some(sync_object) = sync_object {
                let policy = config.full_update_policy;
                let force_full_update = policy.on_restore_from_pending_kill
                    && event.has_pending_kill_change
                    && !is_pending_kill;

                if force_full_update
                    || (policy.on_non_property_changes && event.has_non_property_changes)
                {
                    let mut writer = SyncObjectWriter::new(Some(&mut *table), filter.clone(), false);
                    let property_names = if force_full_update {
                        None
                    } else {
                        Some(root_property_names.as_slice())
                    };
                    writer.serialize_object(sync_object, property_names);
                    update.object_data.serialized_data = writer.to_bytes();
                } else {
                    for root_property_name in &root_property_names {
                        if !is_exported(sync_object, root_property_name, &filter) {
                            continue;
                        }
                        update.property_datas.push(SerializedPropertyData::new(
                            root_property_name.clone(),
                            serialize_property(
                                Some(&mut *table),
                                &filter,
                                sync_object,
                                root_property_name,
                            ),
                        ));
                    }
                }
            }

            pending.finalized_object_updates.push(update);
        }
    }

    /// Sends every finalized transaction and, rate permitting, a snapshot of
    /// every transaction still in progress. Returns how many events were
    /// sent.
    pub fn send_pending(
        &mut self,
        session: &mut dyn ClientSession,
        world: &dyn ObjectWorld,
        config: &SyncConfig,
        now: Instant,
    ) -> usize {
        let snapshot_delay = Duration::from_secs_f64(config.snapshot_delay_seconds());
        let mut sent = 0;

        for operation_id in std::mem::take(&mut self.order) {
            let Some(pending) = self.pending.get_mut(&operation_id) else {
                // canceled before anything was sent
                continue;
            };

            if pending.is_finalized {
                let Some(pending) = self.pending.remove(&operation_id) else {
                    continue;
                };
                if !pending.is_excluded && !pending.finalized_object_updates.is_empty() {
                    send_finalized_event(session, world, pending);
                    sent += 1;
                }
                continue;
            }

            let snapshot_due = pending
                .last_snapshot_time
                .map_or(true, |last_snapshot_time| now >= last_snapshot_time + snapshot_delay);
            if !pending.is_excluded && pending.has_snapshot_updates() && snapshot_due {
                let object_updates = pending.take_snapshot_updates();
                send_snapshot_event(session, world, pending, object_updates);
                pending.last_snapshot_time = Some(now);
                sent += 1;
            }

            self.order.push(operation_id);
        }

        sent
    }

    fn pending_or_report(
        &mut self,
        operation_id: &OperationId,
    ) -> Option<&mut PendingTransactionToSend> {
        let pending = self.pending.get_mut(operation_id);
        if pending.is_none() {
            debug_assert!(false, "operation {} was never started", operation_id);
            error!("Received an update for unknown operation {}", operation_id);
        }
        pending
    }
}

fn is_exported(object: &dyn SyncObject, property: &Name, filter: &PropertyFilter) -> bool {
    find_property(object, property).is_some_and(|descriptor| !filter.should_skip(descriptor, None))
}

fn serialize_property(
    table: Option<&mut LocalIdentifierTable>,
    filter: &PropertyFilter,
    object: &dyn SyncObject,
    property: &Name,
) -> Vec<u8> {
    let mut writer = SyncObjectWriter::new(table, filter.clone(), false);
    writer.serialize_property(object, property);
    writer.to_bytes()
}

/// Draws the next update index for `transaction_id` from the session
/// scratchpad. The first event of a transaction gets 0.
fn next_update_index(
    session: &mut dyn ClientSession,
    transaction_id: &TransactionId,
) -> TransactionUpdateIndex {
    let key = transaction_scratchpad_key(transaction_id);
    let scratchpad = session.scratchpad();
    match scratchpad.value_mut::<TransactionUpdateIndex>(&key) {
        Some(next) => {
            let index = *next;
            *next = next.wrapping_add(1);
            index
        }
        None => {
            let next: TransactionUpdateIndex = 1;
            scratchpad.set_value(key, next);
            0
        }
    }
}

fn fill_event_base(
    session: &mut dyn ClientSession,
    world: &dyn ObjectWorld,
    pending: &PendingTransactionToSend,
    exported_objects: Vec<ExportedObject>,
) -> TransactionEventBase {
    TransactionEventBase {
        transaction_id: pending.transaction_id,
        operation_id: pending.operation_id,
        transaction_endpoint_id: session.client_endpoint_id(),
        transaction_update_index: next_update_index(session, &pending.transaction_id),
        modified_packages: pending.modified_packages.clone(),
        primary_object_id: pending
            .primary_object
            .and_then(|primary_object| object_id_of(world, primary_object))
            .unwrap_or_else(ObjectId::none),
        exported_objects,
    }
}

fn send_finalized_event(
    session: &mut dyn ClientSession,
    world: &dyn ObjectWorld,
    mut pending: PendingTransactionToSend,
) {
    let exported_objects = std::mem::take(&mut pending.finalized_object_updates);
    let event = TransactionFinalizedEvent {
        base: fill_event_base(session, world, &pending, exported_objects),
        local_identifier_state: pending.finalized_identifier_table.state(),
        title: pending.title,
    };
    trace!(
        "Sending finalized transaction {} ({} objects)",
        event.base.transaction_id,
        event.base.exported_objects.len()
    );
    let server_endpoint_id = session.server_endpoint_id();
    session.send_custom_event(
        SessionEvent::TransactionFinalized(event),
        server_endpoint_id,
        MessageFlags::RELIABLE_ORDERED,
    );
}

fn send_snapshot_event(
    session: &mut dyn ClientSession,
    world: &dyn ObjectWorld,
    pending: &PendingTransactionToSend,
    exported_objects: Vec<ExportedObject>,
) {
    let event = TransactionSnapshotEvent {
        base: fill_event_base(session, world, pending, exported_objects),
    };
    trace!(
        "Sending snapshot of transaction {} (update {})",
        event.base.transaction_id,
        event.base.transaction_update_index
    );
    let server_endpoint_id = session.server_endpoint_id();
    session.send_custom_event(
        SessionEvent::TransactionSnapshot(event),
        server_endpoint_id,
        MessageFlags::NONE,
    );
}
