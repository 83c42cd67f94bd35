mod error;
mod transaction_ledger;
mod transient_ledger;

pub use error::LedgerError;
pub use transaction_ledger::{deserialize_transaction, serialize_transaction, TransactionLedger};
pub use transient_ledger::TransientTransactionLedger;
