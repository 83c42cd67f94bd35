use std::rc::Rc;

use log::{trace, warn};

use tandem_shared::{
    find_property, object_id_of, package_name_of, resolve_pending_loads, ExportedObject,
    Name, ObjectId, ObjectKey, ObjectNotification, ObjectTransactedEvent,
    ObjectTransactedKind, ObjectWorld, PropertyChangeType, SyncObjectReader,
    TransactionAnnotation, TransactionContext, TransactionEvent, WorldRemapper,
};

/// How [`get_object`] settled on an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedObject {
    /// The object already existed. `needs_gc` is set when a rename collided
    /// with an existing object and the old one was killed.
    Found { key: ObjectKey, needs_gc: bool },
    /// The object was created. `needs_finish` is set for deferred actor
    /// spawns, which must be finished once their state has been applied.
    Created { key: ObjectKey, needs_finish: bool },
}

impl ResolvedObject {
    pub fn key(&self) -> ObjectKey {
        match self {
            ResolvedObject::Found { key, .. } | ResolvedObject::Created { key, .. } => *key,
        }
    }

    pub fn needs_gc(&self) -> bool {
        matches!(self, ResolvedObject::Found { needs_gc: true, .. })
    }

    pub fn needs_finish(&self) -> bool {
        matches!(self, ResolvedObject::Created { needs_finish: true, .. })
    }

    pub fn was_created(&self) -> bool {
        matches!(self, ResolvedObject::Created { .. })
    }
}

/// Finds the object identified by `object_id`, applying a rename or reparent
/// when `new_name` or `new_outer_path_name` are set, and creating it at its
/// target location if it does not exist and `allow_create` is set.
pub fn get_object(
    world: &mut dyn ObjectWorld,
    object_id: &ObjectId,
    new_name: &Name,
    new_outer_path_name: &Name,
    allow_create: bool,
) -> Option<ResolvedObject> {
    let has_rename = !new_name.is_none();
    let has_reparent = !new_outer_path_name.is_none();
    let target_name = if has_rename { new_name } else { &object_id.object_name };
    let target_outer_path_name = if has_reparent {
        new_outer_path_name
    } else {
        &object_id.outer_path_name
    };

    let existing = world.find_object(
        &object_id.outer_path_name,
        &object_id.object_name,
        &object_id.class_path_name,
    );

    if let Some(existing) = existing {
        if !has_rename && !has_reparent {
            reapply_flags(world, existing, object_id);
            return Some(ResolvedObject::Found {
                key: existing,
                needs_gc: false,
            });
        }

        if let Some(target) =
            world.find_object(target_outer_path_name, target_name, &object_id.class_path_name)
        {
            if target != existing {
                warn!(
                    "Rename of '{}' to '{}' collides with an existing object; replacing it",
                    object_id.path_name(),
                    world.path_name(target).unwrap_or_default()
                );
                world.set_pending_kill(existing, true);
                reapply_flags(world, target, object_id);
                return Some(ResolvedObject::Found {
                    key: target,
                    needs_gc: true,
                });
            }
        }

        let new_outer = if has_reparent {
            let outer = world.find_object_by_path(&target_outer_path_name.to_string());
            if outer.is_none() {
                warn!(
                    "Cannot move '{}' into missing outer '{}'",
                    object_id.path_name(),
                    target_outer_path_name
                );
            }
            outer
        } else {
            None
        };
        if !world.rename_object(existing, target_name, new_outer) {
            warn!(
                "Failed to rename '{}' to '{}'",
                object_id.path_name(),
                target_name
            );
        }
        reapply_flags(world, existing, object_id);
        return Some(ResolvedObject::Found {
            key: existing,
            needs_gc: false,
        });
    }

    // a previous event may already have moved the object to its target
    if has_rename || has_reparent {
        if let Some(target) =
            world.find_object(target_outer_path_name, target_name, &object_id.class_path_name)
        {
            reapply_flags(world, target, object_id);
            return Some(ResolvedObject::Found {
                key: target,
                needs_gc: false,
            });
        }
    }

    if !allow_create {
        return None;
    }

    let outer = world.find_object_by_path(&target_outer_path_name.to_string())?;

    if world.is_actor_class(&object_id.class_path_name) {
        if let Some(level) = world.owning_level(outer) {
            let key = world.spawn_actor_deferred(
                &object_id.class_path_name,
                level,
                target_name,
                object_id.flags,
            )?;
            return Some(ResolvedObject::Created {
                key,
                needs_finish: true,
            });
        }
    }

    let key = world.construct_object(
        &object_id.class_path_name,
        outer,
        target_name,
        object_id.flags,
    )?;
    Some(ResolvedObject::Created {
        key,
        needs_finish: false,
    })
}

fn reapply_flags(world: &mut dyn ObjectWorld, object: ObjectKey, object_id: &ObjectId) {
    let flags = world.flags(object) | object_id.flags;
    world.set_flags(object, flags);
}

/// Brings `object`'s pending-kill state in line with `is_pending_kill`.
/// Returns whether it changed.
pub fn update_pending_kill_state(
    world: &mut dyn ObjectWorld,
    object: ObjectKey,
    is_pending_kill: bool,
) -> bool {
    if world.is_pending_kill(object) == is_pending_kill {
        return false;
    }
    world.set_pending_kill(object, is_pending_kill);
    true
}

/// What one [`TransactionApplier::apply`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Objects that were found or created
    pub resolved: usize,
    pub created: usize,
    /// Objects outside the restricted packages, or that could not be resolved
    pub skipped: usize,
    /// Referenced objects brought into memory
    pub loaded: usize,
    pub garbage_collected: bool,
}

struct ResolvedUpdate {
    object: ResolvedObject,
    annotation: Option<Rc<dyn TransactionAnnotation>>,
    /// Properties of the update that the object actually has
    properties: Vec<Name>,
    pending_kill_changed: bool,
}

/// Applies a received transaction event to an [`ObjectWorld`].
pub struct TransactionApplier<'w> {
    world: &'w mut dyn ObjectWorld,
}

impl<'w> TransactionApplier<'w> {
    pub fn new(world: &'w mut dyn ObjectWorld) -> Self {
        Self { world }
    }

    /// Applies `event`. When `packages_to_process` is not empty, objects
    /// living in any other package are left alone.
    pub fn apply(&mut self, event: &TransactionEvent, packages_to_process: &[Name]) -> ApplyReport {
        let is_snapshot = event.is_snapshot();
        let table = event.identifier_table();
        let base = event.base();
        let mut report = ApplyReport::default();

        trace!(
            "Applying {} {} ({} objects)",
            event.type_name(),
            base.transaction_id,
            base.exported_objects.len()
        );

        // Phase 1: find or create, outers first
        let mut objects_deleted = false;
        let mut resolved: Vec<Option<ResolvedUpdate>> =
            base.exported_objects.iter().map(|_| None).collect();
        let mut sorted: Vec<(usize, &ExportedObject)> =
            base.exported_objects.iter().enumerate().collect();
        sorted.sort_by_key(|(_, update)| update.object_path_depth);

        for (index, update) in sorted {
            if !packages_to_process.is_empty() {
                let outer_path = update.effective_outer_path_name().to_string();
                let package_name = Name::new(package_name_of(&outer_path));
                if !packages_to_process.contains(&package_name) {
                    continue;
                }
            }

            let Some(object) = get_object(
                self.world,
                &update.object_id,
                &update.object_data.new_name,
                &update.object_data.new_outer_path_name,
                update.object_data.allow_create,
            ) else {
                trace!("Could not resolve '{}'", update.object_id.path_name());
                continue;
            };

            objects_deleted |= update.object_data.is_pending_kill || object.needs_gc();
            report.resolved += 1;
            if object.was_created() {
                report.created += 1;
            }
            resolved[index] = Some(ResolvedUpdate {
                object,
                annotation: None,
                properties: Vec::new(),
                pending_kill_changed: false,
            });
        }
        report.skipped = base.exported_objects.len() - report.resolved;

        let primary_object = if base.primary_object_id.is_none() {
            None
        } else {
            get_object(self.world, &base.primary_object_id, &Name::none(), &Name::none(), false)
                .map(|object| object.key())
        };
        let mut context = TransactionContext::new(base.transaction_id, base.operation_id)
            .with_title("Remote Transaction");
        context.primary_object = primary_object;

        let previous_squelch = if is_snapshot {
            None
        } else {
            self.world
                .undo_history()
                .map(|history| history.set_squelch_notifications(true))
        };
        if !is_snapshot {
            self.world.broadcast(ObjectNotification::BeforeUndoRedo {
                context: context.clone(),
            });
        }

        // Phase 2: restore annotations and notify before anything changes
        for (slot, update) in resolved.iter_mut().zip(&base.exported_objects) {
            let Some(slot) = slot else {
                continue;
            };
            let key = slot.object.key();
            let Some(object) = self.world.object_mut(key) else {
                continue;
            };

            if !update.serialized_annotation_data.is_empty() {
                let mut reader = SyncObjectReader::new(
                    &update.serialized_annotation_data,
                    table.as_ref(),
                    WorldRemapper::default(),
                );
                slot.annotation = object.restore_annotation(&mut reader);
                if slot.annotation.is_none() {
                    warn!(
                        "Object '{}' had annotation data that failed to restore",
                        update.object_id.path_name()
                    );
                }
            }

            if !is_snapshot || slot.annotation.is_some() {
                object.pre_edit_undo();
            }

            for property_data in &update.property_datas {
                if find_property(&*object, &property_data.property_name).is_some() {
                    slot.properties.push(property_data.property_name.clone());
                }
            }
            if is_snapshot {
                for property in &slot.properties {
                    object.pre_edit_change(property);
                }
            }

            for property in &slot.properties {
                self.world
                    .broadcast(ObjectNotification::PreObjectPropertyChanged {
                        object: key,
                        property: property.clone(),
                    });
            }
        }

        // Phase 3: apply state
        let mut pending_loads = Vec::new();
        for (slot, update) in resolved.iter_mut().zip(&base.exported_objects) {
            let Some(slot) = slot else {
                continue;
            };
            let key = slot.object.key();
            slot.pending_kill_changed =
                update_pending_kill_state(self.world, key, update.object_data.is_pending_kill);

            let Some(object) = self.world.object_mut(key) else {
                continue;
            };

            if !update.object_data.serialized_data.is_empty() {
                let mut reader = SyncObjectReader::new(
                    &update.object_data.serialized_data,
                    table.as_ref(),
                    WorldRemapper::default(),
                );
                if let Err(error) = reader.deserialize_object(object) {
                    warn!(
                        "Failed to apply object data to '{}': {}",
                        update.object_id.path_name(),
                        error
                    );
                }
                pending_loads.append(&mut reader.take_pending_loads());
            } else {
                for property_data in &update.property_datas {
                    let mut reader = SyncObjectReader::new(
                        &property_data.serialized_data,
                        table.as_ref(),
                        WorldRemapper::default(),
                    );
                    if let Err(error) =
                        reader.deserialize_property(object, &property_data.property_name)
                    {
                        warn!(
                            "Failed to apply property '{}' to '{}': {}",
                            property_data.property_name,
                            update.object_id.path_name(),
                            error
                        );
                    }
                    pending_loads.append(&mut reader.take_pending_loads());
                }
            }
        }
        report.loaded =
            resolve_pending_loads(self.world, &WorldRemapper::default(), &pending_loads);

        // Phase 4: finish spawns and notify
        for (slot, update) in resolved.iter().zip(&base.exported_objects) {
            let Some(slot) = slot else {
                continue;
            };
            let key = slot.object.key();

            if slot.object.needs_finish() {
                self.world.finish_spawning(key);
            }

            if let Some(object) = self.world.object_mut(key) {
                if is_snapshot {
                    for _ in &slot.properties {
                        object.post_edit_change();
                    }
                }
                if slot.annotation.is_some() || !is_snapshot {
                    object.post_edit_undo(slot.annotation.as_ref());
                }
            }

            let change_type = if is_snapshot {
                PropertyChangeType::Interactive
            } else {
                PropertyChangeType::Unspecified
            };
            for property in &slot.properties {
                self.world.broadcast(ObjectNotification::ObjectPropertyChanged {
                    object: key,
                    property: property.clone(),
                    change_type,
                });
            }

            if !is_snapshot {
                let transacted = self.transacted_event(&context, update, slot);
                self.world.broadcast(ObjectNotification::ObjectTransacted {
                    object: key,
                    event: transacted,
                });
            }
        }

        if !is_snapshot {
            self.world.broadcast(ObjectNotification::AfterUndoRedo {
                context,
                succeeded: true,
            });
        }
        if let Some(previous_squelch) = previous_squelch {
            if let Some(history) = self.world.undo_history() {
                history.set_squelch_notifications(previous_squelch);
            }
        }

        if objects_deleted {
            self.world.collect_garbage();
            report.garbage_collected = true;
        }

        report
    }

    fn transacted_event(
        &self,
        context: &TransactionContext,
        update: &ExportedObject,
        slot: &ResolvedUpdate,
    ) -> ObjectTransactedEvent {
        let key = slot.object.key();
        let current_id = object_id_of(&*self.world, key);
        let (outer_path_name, object_name) = match current_id {
            Some(id) => (id.outer_path_name, id.object_name),
            None => (
                update.object_id.outer_path_name.clone(),
                update.object_id.object_name.clone(),
            ),
        };

        let mut event = ObjectTransactedEvent::new(
            context,
            ObjectTransactedKind::UndoRedo,
            outer_path_name,
            object_name,
        );
        event.has_name_change = !update.object_data.new_name.is_none();
        event.has_outer_change = !update.object_data.new_outer_path_name.is_none();
        event.has_pending_kill_change = slot.pending_kill_changed;
        event.has_non_property_changes = !update.object_data.serialized_data.is_empty();
        event.changed_properties = update
            .property_datas
            .iter()
            .map(|property_data| property_data.property_name.to_string())
            .collect();
        event.annotation = slot.annotation.clone();
        event
    }
}
