use std::collections::{BTreeMap, HashMap};

use log::trace;

use tandem_serde::Name;

use crate::{messages::TransactionEvent, payload::CompressionConfig, types::TransactionIndex};

use super::{deserialize_transaction, LedgerError, TransactionLedger};

/// An in-memory ledger that lives as long as the session.
#[derive(Debug, Default)]
pub struct TransientTransactionLedger {
    compression: CompressionConfig,
    transactions: BTreeMap<TransactionIndex, Vec<u8>>,
    package_transactions: HashMap<Name, Vec<TransactionIndex>>,
}

impl TransientTransactionLedger {
    pub fn new(compression: CompressionConfig) -> Self {
        Self {
            compression,
            transactions: BTreeMap::new(),
            package_transactions: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl TransactionLedger for TransientTransactionLedger {
    fn add_serialized_transaction(
        &mut self,
        index: TransactionIndex,
        bytes: Vec<u8>,
    ) -> Result<(), LedgerError> {
        let event = deserialize_transaction(index, &bytes, &self.compression)?;

        if self.transactions.insert(index, bytes).is_none() {
            for package_name in &event.base().modified_packages {
                self.package_transactions
                    .entry(package_name.clone())
                    .or_default()
                    .push(index);
            }
        }
        trace!("Added transaction {} to the ledger", index);
        Ok(())
    }

    fn find_transaction(&self, index: TransactionIndex) -> Result<TransactionEvent, LedgerError> {
        let bytes = self
            .transactions
            .get(&index)
            .ok_or(LedgerError::TransactionNotFound { index })?;
        deserialize_transaction(index, bytes, &self.compression)
    }

    fn all_live_transactions(&self) -> Vec<TransactionIndex> {
        self.transactions.keys().copied().collect()
    }

    fn live_transactions(&self, package_name: &Name) -> Vec<TransactionIndex> {
        let mut indices = self
            .package_transactions
            .get(package_name)
            .cloned()
            .unwrap_or_default();
        indices.sort_unstable();
        indices
    }
}
