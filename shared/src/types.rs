use uuid::Uuid;

/// Per-transaction emission counter; wraps at 256.
pub type TransactionUpdateIndex = u8;
/// Monotonic index of a transaction in a ledger.
pub type TransactionIndex = u64;
pub type TransactionId = Uuid;
pub type OperationId = Uuid;
pub type EndpointId = Uuid;
