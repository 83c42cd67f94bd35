//! # Tandem Client
//! Captures local editing transactions, sends them over a collaboration
//! session, and applies the transactions other session members make.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use tandem_shared as shared;

mod applier;
mod pending_sender;
mod session;
mod transaction_manager;

pub use applier::{
    get_object, update_pending_kill_state, ApplyReport, ResolvedObject, TransactionApplier,
};
pub use pending_sender::{PendingTransactionSender, PendingTransactionToSend};
pub use session::{ClientSession, SessionEventContext};
pub use transaction_manager::{ClientTransactionManager, PendingTransactionToProcessContext};
