use tandem_serde::Name;

use crate::{
    messages::{TransactionEvent, TransactionFinalizedEvent, TransactionSnapshotEvent},
    payload::{CompressionConfig, PayloadError, TypedPayload},
    types::TransactionIndex,
};

use super::LedgerError;

/// Append-only store of serialized transactions, keyed by a monotonic index.
pub trait TransactionLedger {
    fn add_serialized_transaction(
        &mut self,
        index: TransactionIndex,
        bytes: Vec<u8>,
    ) -> Result<(), LedgerError>;

    fn find_transaction(&self, index: TransactionIndex) -> Result<TransactionEvent, LedgerError>;

    /// Every live transaction, oldest first.
    fn all_live_transactions(&self) -> Vec<TransactionIndex>;

    /// Live transactions that modified `package_name`, oldest first.
    fn live_transactions(&self, package_name: &Name) -> Vec<TransactionIndex>;
}

/// Encodes `event` in the form [`TransactionLedger::add_serialized_transaction`]
/// accepts.
pub fn serialize_transaction(
    event: &TransactionEvent,
    compression: &CompressionConfig,
) -> Result<Vec<u8>, PayloadError> {
    let payload = match event {
        TransactionEvent::Finalized(event) => TypedPayload::try_new(event, compression)?,
        TransactionEvent::Snapshot(event) => TypedPayload::try_new(event, compression)?,
    };
    Ok(payload.to_bytes())
}

pub fn deserialize_transaction(
    index: TransactionIndex,
    bytes: &[u8],
    compression: &CompressionConfig,
) -> Result<TransactionEvent, LedgerError> {
    let undecodable = |source| LedgerError::Undecodable { index, source };

    let payload = TypedPayload::from_bytes(bytes).map_err(undecodable)?;
    if payload.is::<TransactionFinalizedEvent>() {
        let event = payload
            .try_get::<TransactionFinalizedEvent>(compression)
            .map_err(undecodable)?;
        Ok(TransactionEvent::Finalized(event))
    } else if payload.is::<TransactionSnapshotEvent>() {
        let event = payload
            .try_get::<TransactionSnapshotEvent>(compression)
            .map_err(undecodable)?;
        Ok(TransactionEvent::Snapshot(event))
    } else {
        Err(LedgerError::NotATransaction {
            index,
            type_name: payload.type_name,
        })
    }
}
