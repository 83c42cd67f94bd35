use std::time::Instant;

use log::{error, info, trace, warn};

use tandem_shared::{
    sequence_greater_than, transaction_scratchpad_key, LedgerError, Name, ObjectKey,
    ObjectTransactedEvent, ObjectWorld, SessionEvent, SessionEventKind, SyncConfig,
    TransactionContext, TransactionEvent, TransactionEventBase, TransactionId, TransactionIndex,
    TransactionLedger, TransactionRejectedEvent, TransactionState, TransactionUpdateIndex,
    UndoHistory,
};

use crate::{
    applier::TransactionApplier,
    pending_sender::PendingTransactionSender,
    session::{ClientSession, SessionEventContext},
};

/// How a queued transaction event should be applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingTransactionToProcessContext {
    /// Required events are never dropped, neither for staleness nor while
    /// the host is busy
    pub is_required: bool,
    /// When not empty, only objects in these packages are touched
    pub packages_to_process: Vec<Name>,
}

impl PendingTransactionToProcessContext {
    pub fn required() -> Self {
        Self {
            is_required: true,
            packages_to_process: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct PendingTransactionToProcess {
    context: PendingTransactionToProcessContext,
    event: TransactionEvent,
}

/// Keeps the local object world in sync with the rest of a session.
///
/// Local edits are fed in through
/// [`handle_transaction_state_changed`](Self::handle_transaction_state_changed)
/// and [`handle_object_transacted`](Self::handle_object_transacted), remote
/// ones through [`handle_remote_transaction`](Self::handle_remote_transaction)
/// and [`handle_session_event`](Self::handle_session_event). Both directions
/// are flushed by [`process_pending`](Self::process_pending), which the host
/// calls once per tick.
pub struct ClientTransactionManager<S: ClientSession> {
    session: S,
    ledger: Box<dyn TransactionLedger>,
    config: SyncConfig,
    pending_sender: PendingTransactionSender,
    pending_to_process: Vec<PendingTransactionToProcess>,
}

impl<S: ClientSession> ClientTransactionManager<S> {
    pub fn new(mut session: S, ledger: Box<dyn TransactionLedger>, config: SyncConfig) -> Self {
        session.register_event_kind(SessionEventKind::TransactionSnapshot);
        session.register_event_kind(SessionEventKind::TransactionRejected);

        Self {
            session,
            ledger,
            config,
            pending_sender: PendingTransactionSender::new(),
            pending_to_process: Vec::new(),
        }
    }

    /// Like [`new`](Self::new), but picks up a transaction the host is
    /// already recording.
    pub fn new_with_context(
        session: S,
        ledger: Box<dyn TransactionLedger>,
        config: SyncConfig,
        world: &dyn ObjectWorld,
    ) -> Self {
        let mut manager = Self::new(session, ledger, config);
        if let Some(context) = world.current_transaction() {
            manager.handle_transaction_state_changed(&context, TransactionState::TransactionStarted);
        }
        manager
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn ledger(&self) -> &dyn TransactionLedger {
        self.ledger.as_ref()
    }

    pub fn ledger_mut(&mut self) -> &mut dyn TransactionLedger {
        self.ledger.as_mut()
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn pending_sender(&self) -> &PendingTransactionSender {
        &self.pending_sender
    }

    /// Number of received events waiting to be applied.
    pub fn pending_to_process_len(&self) -> usize {
        self.pending_to_process.len()
    }

    /// Queues every live transaction in the ledger for application.
    /// Returns how many were queued.
    pub fn replay_all_transactions(&mut self) -> usize {
        let indices = self.ledger.all_live_transactions();
        self.replay(&indices, PendingTransactionToProcessContext::required())
    }

    /// Queues the live transactions that touched `package_name`, restricted to
    /// objects in that package. Returns how many were queued.
    pub fn replay_transactions(&mut self, package_name: &Name) -> usize {
        let indices = self.ledger.live_transactions(package_name);
        let context = PendingTransactionToProcessContext {
            is_required: true,
            packages_to_process: vec![package_name.clone()],
        };
        self.replay(&indices, context)
    }

    fn replay(
        &mut self,
        indices: &[TransactionIndex],
        context: PendingTransactionToProcessContext,
    ) -> usize {
        if !indices.is_empty() {
            info!("Replaying {} transactions", indices.len());
        }

        let mut queued = 0;
        for index in indices {
            match self.ledger.find_transaction(*index) {
                Ok(event) => {
                    self.pending_to_process.push(PendingTransactionToProcess {
                        context: context.clone(),
                        event,
                    });
                    queued += 1;
                }
                Err(error) => {
                    error!("Skipping transaction during replay: {}", error);
                }
            }
        }
        queued
    }

    /// Records a transaction the server has accepted, and queues it for
    /// application when `apply` is set and it came from another endpoint.
    pub fn handle_remote_transaction(
        &mut self,
        index: TransactionIndex,
        bytes: Vec<u8>,
        apply: bool,
    ) -> Result<(), LedgerError> {
        self.ledger.add_serialized_transaction(index, bytes)?;

        if !apply {
            return Ok(());
        }

        let event = self.ledger.find_transaction(index)?;
        if event.base().transaction_endpoint_id == self.session.client_endpoint_id() {
            trace!("Ignoring echo of our own transaction {}", event.base().transaction_id);
            return Ok(());
        }

        self.pending_to_process.push(PendingTransactionToProcess {
            context: PendingTransactionToProcessContext::required(),
            event,
        });
        Ok(())
    }

    /// Entry point for custom events delivered by the session.
    pub fn handle_session_event(
        &mut self,
        world: &mut dyn ObjectWorld,
        context: SessionEventContext,
        event: SessionEvent,
    ) {
        match event {
            SessionEvent::TransactionSnapshot(event) => {
                self.pending_to_process.push(PendingTransactionToProcess {
                    context: PendingTransactionToProcessContext {
                        is_required: context.message_flags.is_reliable_ordered(),
                        packages_to_process: Vec::new(),
                    },
                    event: event.into(),
                });
            }
            SessionEvent::TransactionFinalized(event) => {
                // finalized events normally arrive through the ledger
                self.pending_to_process.push(PendingTransactionToProcess {
                    context: PendingTransactionToProcessContext::required(),
                    event: event.into(),
                });
            }
            SessionEvent::TransactionRejected(event) => {
                undo_rejected_transaction(world, &event);
            }
        }
    }

    pub fn handle_transaction_state_changed(
        &mut self,
        context: &TransactionContext,
        state: TransactionState,
    ) {
        self.pending_sender
            .handle_transaction_state_changed(context, state);
    }

    pub fn handle_object_transacted(
        &mut self,
        world: &dyn ObjectWorld,
        object: ObjectKey,
        event: &ObjectTransactedEvent,
    ) {
        self.pending_sender
            .handle_object_transacted(world, object, event, &self.config);
    }

    /// Applies queued remote events if the host allows it, otherwise drops
    /// the ones that are not required. Then sends whatever local transactions
    /// are ready. Returns how many remote events were applied.
    pub fn process_pending(&mut self, world: &mut dyn ObjectWorld, now: Instant) -> usize {
        let mut applied = 0;

        if !self.pending_to_process.is_empty() {
            if self.can_process_transaction_event(world) {
                for pending in std::mem::take(&mut self.pending_to_process) {
                    if !self.should_process_transaction_event(
                        pending.event.base(),
                        pending.context.is_required,
                    ) {
                        trace!(
                            "Dropping transaction {} (update {}) as it arrived out of order",
                            pending.event.base().transaction_id,
                            pending.event.base().transaction_update_index
                        );
                        continue;
                    }
                    TransactionApplier::new(world)
                        .apply(&pending.event, &pending.context.packages_to_process);
                    applied += 1;
                }
            } else {
                self.pending_to_process
                    .retain(|pending| pending.context.is_required);
            }
        }

        self.pending_sender
            .send_pending(&mut self.session, world, &self.config, now);

        applied
    }

    /// Whether an event should be applied given the last update seen for its
    /// transaction from the same sender.
    pub fn should_process_transaction_event(
        &mut self,
        event: &TransactionEventBase,
        is_required: bool,
    ) -> bool {
        let key = transaction_scratchpad_key(&event.transaction_id);
        let incoming = event.transaction_update_index;

        let Some(scratchpad) = self.session.client_scratchpad(&event.transaction_endpoint_id)
        else {
            return true;
        };

        if is_required {
            scratchpad.set_value(key, incoming);
            return true;
        }

        match scratchpad.value_mut::<TransactionUpdateIndex>(&key) {
            Some(last_seen) => {
                let should_process = sequence_greater_than(incoming, *last_seen);
                *last_seen = incoming;
                should_process
            }
            None => {
                scratchpad.set_value(key, incoming);
                true
            }
        }
    }

    /// False while the host is busy with something remote changes must not
    /// interrupt, or while the session is suspended.
    pub fn can_process_transaction_event(&self, world: &dyn ObjectWorld) -> bool {
        world.can_perform_blocking_action() && !self.session.is_suspended()
    }

}

/// Brings the undo history to the state it would have had without the
/// rejected transaction. The history's notifications are squelched for the
/// duration, so the host must not forward the undo and redo steps taken
/// here as local transactions.
fn undo_rejected_transaction(world: &mut dyn ObjectWorld, event: &TransactionRejectedEvent) {
    let is_current = world
        .current_transaction()
        .is_some_and(|context| context.transaction_id == event.transaction_id);
    let Some(history) = world.undo_history() else {
        return;
    };

    let previous_squelch = history.set_squelch_notifications(true);

    if is_current {
        debug_assert!(
            false,
            "rejection received for in-progress transaction {}",
            event.transaction_id
        );
        warn!(
            "Received a rejection for the in-progress transaction {}",
            event.transaction_id
        );
        history.end_current();
        history.undo();
    } else {
        walk_to_undone(history, &event.transaction_id);
    }

    history.set_squelch_notifications(previous_squelch);
}

/// Undoes or redoes until `transaction_id` is the first undone transaction.
fn walk_to_undone(history: &mut dyn UndoHistory, transaction_id: &TransactionId) {
    let Some(index) = history.find_transaction_index(transaction_id) else {
        trace!("Rejected transaction {} is not in the undo history", transaction_id);
        return;
    };

    let reversed =
        history.queue_length() as i64 - history.undo_count() as i64 - index as i64;
    if reversed > 0 {
        for _ in 0..reversed {
            history.undo();
        }
    } else {
        for _ in 0..(1 - reversed) {
            history.redo();
        }
    }
}

impl<S: ClientSession> Drop for ClientTransactionManager<S> {
    fn drop(&mut self) {
        self.session
            .unregister_event_kind(SessionEventKind::TransactionSnapshot);
        self.session
            .unregister_event_kind(SessionEventKind::TransactionRejected);
    }
}
