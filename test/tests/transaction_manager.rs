/// Integration tests for the transaction manager's handling of remote
/// transactions: ordering, replay, busy hosts and rejections

use std::time::Instant;

use proptest::prelude::*;

use tandem_client::{ClientTransactionManager, SessionEventContext};
use tandem_shared::{
    serialize_transaction, CompressionConfig, CompressionMode, ExportedObject, LedgerError,
    LocalIdentifierTable, MessageFlags, Name, ObjectTransactedKind, ObjectWorld, PayloadError,
    PropertyFilter, Serde, SerdeErr, SessionEvent, SessionEventKind, SyncConfig,
    SyncObjectWriter, TransactionEvent, TransactionLedger, TransactionRejectedEvent,
    TransactionState, TransactionUpdateIndex, TransientTransactionLedger, Uuid,
};
use tandem_test::{
    event_base, finalized_event, local_change, new_context, snapshot_event, ExportedObjectBuilder,
    TestSession, TestUndoHistory, TestWorld, UndoStep,
};

const LEVEL_PATH: &str = "/Game/Level.Level:PersistentLevel";

fn manager_with(session: &mut TestSession) -> ClientTransactionManager<&mut TestSession> {
    let config = SyncConfig::default();
    let ledger = TransientTransactionLedger::new(config.compression.clone());
    ClientTransactionManager::new(session, Box::new(ledger), config)
}

fn snapshot_update(
    endpoint_id: Uuid,
    transaction_id: Uuid,
    update_index: TransactionUpdateIndex,
) -> SessionEvent {
    let mut event = snapshot_event(endpoint_id, Vec::new());
    event.base.transaction_id = transaction_id;
    event.base.transaction_update_index = update_index;
    SessionEvent::TransactionSnapshot(event)
}

fn intensity_update(
    outer_path_name: &str,
    intensity: f32,
    table: &mut LocalIdentifierTable,
) -> ExportedObject {
    let mut writer = SyncObjectWriter::new(Some(table), PropertyFilter::default(), false);
    intensity.ser(&mut writer);
    ExportedObjectBuilder::light(outer_path_name, "Lamp")
        .property("Intensity", writer.to_bytes())
        .build()
}

fn ledger_bytes(event: impl Into<TransactionEvent>) -> Vec<u8> {
    serialize_transaction(&event.into(), &SyncConfig::default().compression)
        .expect("event should serialize")
}

#[test]
fn out_of_order_snapshots_are_dropped() {
    let (mut world, level) = TestWorld::with_level();
    let lamp = world.add_light(level, "Lamp", 1.0);
    let mut session = TestSession::new();
    let remote = Uuid::new_v4();
    session.add_client(remote);
    let mut manager = manager_with(&mut session);

    let transaction_id = Uuid::new_v4();
    let mut applied = Vec::new();
    let mut intensities = Vec::new();
    for (update_index, intensity) in [(0, 10.0), (1, 11.0), (2, 12.0), (1, 99.0), (3, 13.0)] {
        let mut table = LocalIdentifierTable::new();
        let update = intensity_update(LEVEL_PATH, intensity, &mut table);
        let mut event = snapshot_event(remote, vec![update]);
        event.base.transaction_id = transaction_id;
        event.base.transaction_update_index = update_index;
        manager.handle_session_event(
            &mut world,
            SessionEventContext::new(remote, MessageFlags::NONE),
            SessionEvent::TransactionSnapshot(event),
        );

        applied.push(manager.process_pending(&mut world, Instant::now()));
        intensities.push(world.light(lamp).expect("light exists").intensity);
    }

    // only the repeated update 1 is dropped
    assert_eq!(applied, vec![1, 1, 1, 0, 1]);
    assert_eq!(intensities, vec![10.0, 11.0, 12.0, 12.0, 13.0]);
    assert_eq!(manager.pending_to_process_len(), 0);
}

#[test]
fn required_events_are_processed_regardless_of_order() {
    let mut session = TestSession::new();
    let remote = Uuid::new_v4();
    session.add_client(remote);
    let mut manager = manager_with(&mut session);

    let mut base = event_base(remote, Vec::new());
    base.transaction_update_index = 2;
    assert!(manager.should_process_transaction_event(&base, false));

    base.transaction_update_index = 1;
    assert!(manager.should_process_transaction_event(&base, true));

    // the required update became the latest seen
    base.transaction_update_index = 2;
    assert!(manager.should_process_transaction_event(&base, false));
    base.transaction_update_index = 2;
    assert!(!manager.should_process_transaction_event(&base, false));
}

#[test]
fn update_indices_wrap_around() {
    let mut session = TestSession::new();
    let remote = Uuid::new_v4();
    session.add_client(remote);
    let mut manager = manager_with(&mut session);

    let mut base = event_base(remote, Vec::new());
    base.transaction_update_index = 255;
    assert!(manager.should_process_transaction_event(&base, false));
    base.transaction_update_index = 0;
    assert!(manager.should_process_transaction_event(&base, false));
    base.transaction_update_index = 254;
    assert!(!manager.should_process_transaction_event(&base, false));
}

#[test]
fn events_from_unknown_senders_are_processed() {
    let mut session = TestSession::new();
    let mut manager = manager_with(&mut session);

    let mut base = event_base(Uuid::new_v4(), Vec::new());
    base.transaction_update_index = 5;
    assert!(manager.should_process_transaction_event(&base, false));
    base.transaction_update_index = 1;
    assert!(manager.should_process_transaction_event(&base, false));
}

#[test]
fn busy_host_keeps_only_required_events() {
    let mut world = TestWorld::new();
    let mut session = TestSession::new();
    let remote = Uuid::new_v4();
    session.add_client(remote);
    let mut manager = manager_with(&mut session);

    manager.handle_session_event(
        &mut world,
        SessionEventContext::new(remote, MessageFlags::NONE),
        snapshot_update(remote, Uuid::new_v4(), 0),
    );
    manager.handle_session_event(
        &mut world,
        SessionEventContext::new(remote, MessageFlags::RELIABLE_ORDERED),
        snapshot_update(remote, Uuid::new_v4(), 0),
    );

    world.busy = true;
    assert!(!manager.can_process_transaction_event(&world));
    assert_eq!(manager.process_pending(&mut world, Instant::now()), 0);
    assert_eq!(manager.pending_to_process_len(), 1);

    world.busy = false;
    assert_eq!(manager.process_pending(&mut world, Instant::now()), 1);
    assert_eq!(manager.pending_to_process_len(), 0);
}

#[test]
fn suspended_session_defers_processing() {
    let mut world = TestWorld::new();
    let mut session = TestSession::new();
    let remote = Uuid::new_v4();
    let mut manager = manager_with(&mut session);

    let table = LocalIdentifierTable::new();
    manager.handle_session_event(
        &mut world,
        SessionEventContext::new(remote, MessageFlags::RELIABLE_ORDERED),
        SessionEvent::TransactionFinalized(finalized_event(remote, Vec::new(), &table)),
    );

    manager.session_mut().suspended = true;
    assert_eq!(manager.process_pending(&mut world, Instant::now()), 0);
    assert_eq!(manager.pending_to_process_len(), 1);

    manager.session_mut().suspended = false;
    assert_eq!(manager.process_pending(&mut world, Instant::now()), 1);
}

#[test]
fn replay_applies_the_ledger_in_order() {
    let (mut world, level) = TestWorld::with_level();
    let lamp = world.add_light(level, "Lamp", 1.0);
    let mut session = TestSession::new();
    let remote = Uuid::new_v4();
    let mut manager = manager_with(&mut session);

    for (index, intensity) in [(0, 2.0), (1, 7.0)] {
        let mut table = LocalIdentifierTable::new();
        let update = intensity_update(LEVEL_PATH, intensity, &mut table);
        let bytes = ledger_bytes(finalized_event(remote, vec![update], &table));
        manager
            .handle_remote_transaction(index, bytes, false)
            .expect("transaction should be stored");
    }
    assert_eq!(manager.pending_to_process_len(), 0);

    assert_eq!(manager.replay_all_transactions(), 2);
    assert_eq!(manager.process_pending(&mut world, Instant::now()), 2);
    assert_eq!(world.light(lamp).expect("light exists").intensity, 7.0);
}

#[test]
fn package_replay_only_touches_that_package() {
    let (mut world, level) = TestWorld::with_level();
    let lamp = world.add_light(level, "Lamp", 1.0);
    let other_package = world.add_root(tandem_test::test_protocol::PACKAGE_CLASS, "/Game/Other");
    let other = world.add_light(other_package, "Lamp", 1.0);
    let mut session = TestSession::new();
    let remote = Uuid::new_v4();
    let mut manager = manager_with(&mut session);

    // one transaction touching both packages, one touching only the level
    let mut table = LocalIdentifierTable::new();
    let updates = vec![
        intensity_update(LEVEL_PATH, 4.0, &mut table),
        intensity_update("/Game/Other", 4.0, &mut table),
    ];
    let mut both = finalized_event(remote, updates, &table);
    both.base.modified_packages = vec![Name::new("/Game/Level"), Name::new("/Game/Other")];
    manager
        .handle_remote_transaction(0, ledger_bytes(both), false)
        .expect("transaction should be stored");

    let mut table = LocalIdentifierTable::new();
    let level_only_update = intensity_update(LEVEL_PATH, 8.0, &mut table);
    let level_only = finalized_event(remote, vec![level_only_update], &table);
    manager
        .handle_remote_transaction(1, ledger_bytes(level_only), false)
        .expect("transaction should be stored");

    assert_eq!(manager.ledger().live_transactions(&Name::new("/Game/Other")), vec![0]);
    assert_eq!(manager.replay_transactions(&Name::new("/Game/Other")), 1);
    assert_eq!(manager.process_pending(&mut world, Instant::now()), 1);

    assert_eq!(world.light(other).expect("light exists").intensity, 4.0);
    assert_eq!(world.light(lamp).expect("light exists").intensity, 1.0);
}

#[test]
fn own_transactions_are_stored_but_not_applied() {
    let mut session = TestSession::new();
    let own_endpoint = session.endpoint_id;
    let mut manager = manager_with(&mut session);

    let table = LocalIdentifierTable::new();
    let bytes = ledger_bytes(finalized_event(own_endpoint, Vec::new(), &table));
    manager
        .handle_remote_transaction(3, bytes, true)
        .expect("transaction should be stored");

    assert_eq!(manager.pending_to_process_len(), 0);
    assert!(manager.ledger().find_transaction(3).is_ok());
}

#[test]
fn undecodable_remote_transactions_are_reported() {
    let mut session = TestSession::new();
    let mut manager = manager_with(&mut session);

    let result = manager.handle_remote_transaction(0, vec![1, 2, 3], true);
    assert!(result.is_err());
    assert_eq!(manager.pending_to_process_len(), 0);
}

#[test]
fn corrupted_identifier_tags_are_reported() {
    let mut session = TestSession::new();
    let remote = Uuid::new_v4();
    let config = SyncConfig {
        compression: CompressionConfig::new(CompressionMode::None),
        ..SyncConfig::default()
    };
    let ledger = TransientTransactionLedger::new(config.compression.clone());
    let mut manager = ClientTransactionManager::new(&mut session, Box::new(ledger), config);

    let event = TransactionEvent::Snapshot(snapshot_event(remote, Vec::new()));
    let mut bytes = serialize_transaction(&event, &manager.config().compression)
        .expect("event should serialize");

    // "/Game/Level" is written inline as [tag 0][length 11][text][instance 0]
    let package = b"/Game/Level";
    let text_start = bytes
        .windows(package.len())
        .position(|window| window == package)
        .expect("package name is written inline");
    assert_eq!(bytes[text_start - 2], 0);
    bytes[text_start - 2] = 7;

    let result = manager.handle_remote_transaction(0, bytes, true);
    assert!(matches!(
        result,
        Err(LedgerError::Undecodable {
            index: 0,
            source: PayloadError::Malformed(SerdeErr::UnknownIdentifierSource { tag: 7 }),
        })
    ));
    assert_eq!(manager.pending_to_process_len(), 0);
    assert!(manager.ledger().all_live_transactions().is_empty());
}

#[test]
fn rejection_undoes_back_to_the_rejected_transaction() {
    let mut world = TestWorld::new();
    let transactions: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    world.history = Some(TestUndoHistory::new(transactions.clone()));
    let mut session = TestSession::new();
    let mut manager = manager_with(&mut session);

    manager.handle_session_event(
        &mut world,
        SessionEventContext::new(Uuid::new_v4(), MessageFlags::RELIABLE_ORDERED),
        SessionEvent::TransactionRejected(TransactionRejectedEvent::new(transactions[1])),
    );

    let history = world.history.as_ref().expect("history exists");
    assert_eq!(history.undo_steps(), 2);
    assert_eq!(history.undo_count, 2);
    assert_eq!(history.squelch_log, vec![true, false]);
}

#[test]
fn rejection_of_an_undone_transaction_redoes_past_it() {
    let mut world = TestWorld::new();
    let transactions: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    let mut history = TestUndoHistory::new(transactions.clone());
    history.undo_count = 2;
    world.history = Some(history);
    let mut session = TestSession::new();
    let mut manager = manager_with(&mut session);

    manager.handle_session_event(
        &mut world,
        SessionEventContext::new(Uuid::new_v4(), MessageFlags::RELIABLE_ORDERED),
        SessionEvent::TransactionRejected(TransactionRejectedEvent::new(transactions[2])),
    );

    let history = world.history.as_ref().expect("history exists");
    assert_eq!(history.steps, vec![UndoStep::Redo, UndoStep::Redo]);
    assert_eq!(history.undo_count, 0);
}

#[test]
fn unknown_rejections_leave_history_alone() {
    let mut world = TestWorld::new();
    world.history = Some(TestUndoHistory::new(vec![Uuid::new_v4()]));
    let mut session = TestSession::new();
    let mut manager = manager_with(&mut session);

    manager.handle_session_event(
        &mut world,
        SessionEventContext::new(Uuid::new_v4(), MessageFlags::RELIABLE_ORDERED),
        SessionEvent::TransactionRejected(TransactionRejectedEvent::new(Uuid::new_v4())),
    );

    let history = world.history.as_ref().expect("history exists");
    assert!(history.steps.is_empty());
    assert_eq!(history.squelch_log, vec![true, false]);
}

#[test]
fn event_kinds_are_registered_for_the_manager_lifetime() {
    let mut session = TestSession::new();
    {
        let manager = manager_with(&mut session);
        let registered = &manager.session().registered;
        assert!(registered.contains(&SessionEventKind::TransactionSnapshot));
        assert!(registered.contains(&SessionEventKind::TransactionRejected));
    }
    assert!(session.registered.is_empty());
}

#[test]
fn manager_picks_up_a_transaction_in_progress() {
    let mut world = TestWorld::new();
    let context = new_context();
    world.current_transaction = Some(context.clone());
    let mut session = TestSession::new();

    let manager = ClientTransactionManager::new_with_context(
        &mut session,
        Box::new(TransientTransactionLedger::default()),
        SyncConfig::default(),
        &world,
    );
    assert!(manager.pending_sender().pending(&context.operation_id).is_some());
}

#[test]
fn rename_travels_between_two_clients() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init()
        .ok();

    let (mut world_a, level_a) = TestWorld::with_level();
    let foo_a = world_a.add_light(level_a, "Foo", 1.0);
    let (mut world_b, level_b) = TestWorld::with_level();
    let foo_b = world_b.add_light(level_b, "Foo", 1.0);

    let mut session_a = TestSession::new();
    let mut session_b = TestSession::new();
    session_b.add_client(session_a.endpoint_id);
    let mut manager_a = manager_with(&mut session_a);
    let mut manager_b = manager_with(&mut session_b);

    let context = new_context();
    manager_a.handle_transaction_state_changed(&context, TransactionState::TransactionStarted);
    let mut change = local_change(&context, ObjectTransactedKind::Finalized, &world_a, foo_a, &[]);
    world_a.rename_object(foo_a, &Name::new("Bar"), None);
    change.has_name_change = true;
    manager_a.handle_object_transacted(&world_a, foo_a, &change);
    manager_a.handle_transaction_state_changed(&context, TransactionState::TransactionFinalized);
    manager_a.process_pending(&mut world_a, Instant::now());

    let mut sent = manager_a.session_mut().take_outbox();
    assert_eq!(sent.len(), 1);
    let SessionEvent::TransactionFinalized(finalized) = sent.remove(0).event else {
        panic!("Expected a finalized event");
    };

    // the server hands the accepted transaction to everyone through the ledger
    manager_b
        .handle_remote_transaction(0, ledger_bytes(finalized), true)
        .expect("transaction should be stored");
    assert_eq!(manager_b.process_pending(&mut world_b, Instant::now()), 1);

    assert_eq!(world_b.object_name(foo_b), Some(Name::new("Bar")));
    assert_eq!(world_b.key_of(&format!("{}.Bar", LEVEL_PATH)), Some(foo_b));
    assert!(world_b.key_of(&format!("{}.Foo", LEVEL_PATH)).is_none());
    assert!(manager_b.session().outbox.is_empty());
}

proptest! {
    #[test]
    fn newer_updates_pass_and_older_ones_are_dropped(
        start in any::<TransactionUpdateIndex>(),
        step in 1_u8..128,
    ) {
        let mut session = TestSession::new();
        let remote = Uuid::new_v4();
        session.add_client(remote);
        let mut manager = manager_with(&mut session);

        let mut base = event_base(remote, Vec::new());
        base.transaction_update_index = start;
        prop_assert!(manager.should_process_transaction_event(&base, false));
        base.transaction_update_index = start.wrapping_add(step);
        prop_assert!(manager.should_process_transaction_event(&base, false));
        base.transaction_update_index = start;
        prop_assert!(!manager.should_process_transaction_event(&base, false));
    }
}
