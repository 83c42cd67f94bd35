use tandem_serde::Name;

use crate::{filter::TransactionClassFilter, payload::CompressionConfig};

/// Contains config properties which will be used by a client to sync
/// transactions
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Ceiling on how many snapshot events are sent per second, across all
    /// pending transactions. Values at or below zero are treated as a tiny
    /// positive rate.
    pub snapshot_transactions_per_second: f32,
    /// When not empty, only objects matching one of these filters are synced
    pub include_object_class_filters: Vec<TransactionClassFilter>,
    /// Any object matching one of these filters keeps its whole transaction
    /// from being synced
    pub exclude_transaction_class_filters: Vec<TransactionClassFilter>,
    /// Transient properties that are synced anyway
    pub allowed_transient_properties: Vec<Name>,
    pub include_editor_only_properties: bool,
    /// When a finalized object change is sent as a whole-object update rather
    /// than per property
    pub full_update_policy: FullUpdatePolicy,
    pub compression: CompressionConfig,
}

impl SyncConfig {
    /// Minimum time between two snapshot events, in seconds.
    pub fn snapshot_delay_seconds(&self) -> f64 {
        1.0 / f64::from(self.snapshot_transactions_per_second.max(f32::EPSILON))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            snapshot_transactions_per_second: 10.0,
            include_object_class_filters: Vec::new(),
            exclude_transaction_class_filters: Vec::new(),
            allowed_transient_properties: Vec::new(),
            include_editor_only_properties: true,
            full_update_policy: FullUpdatePolicy::default(),
            compression: CompressionConfig::default(),
        }
    }
}

/// Which object changes force a full object update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FullUpdatePolicy {
    /// The object came back from pending-kill (e.g. an undone delete); every
    /// property is sent
    pub on_restore_from_pending_kill: bool,
    /// The change touched state outside of properties; the changed properties
    /// and native data are sent together
    pub on_non_property_changes: bool,
}

impl Default for FullUpdatePolicy {
    fn default() -> Self {
        Self {
            on_restore_from_pending_kill: true,
            on_non_property_changes: true,
        }
    }
}
