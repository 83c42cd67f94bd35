use thiserror::Error;

use crate::{payload::PayloadError, types::TransactionIndex};

/// Errors that can occur while storing or reading ledger transactions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// No transaction is stored under the index
    #[error("Transaction {index} is not in the ledger")]
    TransactionNotFound { index: TransactionIndex },

    /// The stored bytes could not be decoded
    #[error("Transaction {index} could not be decoded: {source}")]
    Undecodable {
        index: TransactionIndex,
        source: PayloadError,
    },

    /// The stored payload is not a transaction event
    #[error("Transaction {index} holds a payload of type '{type_name}'")]
    NotATransaction {
        index: TransactionIndex,
        type_name: String,
    },
}
