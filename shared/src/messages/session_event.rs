use super::{TransactionFinalizedEvent, TransactionRejectedEvent, TransactionSnapshotEvent};

/// Kinds of custom event a client registers handlers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    TransactionFinalized,
    TransactionSnapshot,
    TransactionRejected,
}

/// A custom event exchanged over the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TransactionFinalized(TransactionFinalizedEvent),
    TransactionSnapshot(TransactionSnapshotEvent),
    TransactionRejected(TransactionRejectedEvent),
}

impl SessionEvent {
    pub fn kind(&self) -> SessionEventKind {
        match self {
            SessionEvent::TransactionFinalized(_) => SessionEventKind::TransactionFinalized,
            SessionEvent::TransactionSnapshot(_) => SessionEventKind::TransactionSnapshot,
            SessionEvent::TransactionRejected(_) => SessionEventKind::TransactionRejected,
        }
    }
}
