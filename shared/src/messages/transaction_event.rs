use tandem_serde::{
    ByteRead, ByteWrite, LocalIdentifierState, LocalIdentifierTable, Name, Serde, SerdeErr,
};
use uuid::Uuid;

use crate::{
    object::ObjectId,
    payload::PayloadType,
    types::{EndpointId, OperationId, TransactionId, TransactionUpdateIndex},
};

use super::{
    uuid_serde::{read_uuid, write_uuid},
    ExportedObject,
};

/// Fields shared by every transaction event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionEventBase {
    pub transaction_id: TransactionId,
    pub operation_id: OperationId,
    /// The endpoint that recorded the transaction
    pub transaction_endpoint_id: EndpointId,
    pub transaction_update_index: TransactionUpdateIndex,
    /// Packages touched by the transaction, unique, in first-touch order
    pub modified_packages: Vec<Name>,
    pub primary_object_id: ObjectId,
    pub exported_objects: Vec<ExportedObject>,
}

impl Serde for TransactionEventBase {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_uuid(writer, &self.transaction_id);
        write_uuid(writer, &self.operation_id);
        write_uuid(writer, &self.transaction_endpoint_id);
        self.transaction_update_index.ser(writer);
        self.modified_packages.ser(writer);
        self.primary_object_id.ser(writer);
        self.exported_objects.ser(writer);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        Ok(Self {
            transaction_id: read_uuid(reader)?,
            operation_id: read_uuid(reader)?,
            transaction_endpoint_id: read_uuid(reader)?,
            transaction_update_index: u8::de(reader)?,
            modified_packages: Vec::<Name>::de(reader)?,
            primary_object_id: ObjectId::de(reader)?,
            exported_objects: Vec::<ExportedObject>::de(reader)?,
        })
    }
}

/// A committed transaction. Sent reliably and kept in the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFinalizedEvent {
    pub base: TransactionEventBase,
    /// State of the identifier table the exported objects were written with
    pub local_identifier_state: LocalIdentifierState,
    pub title: String,
}

impl Serde for TransactionFinalizedEvent {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.base.ser(writer);
        self.local_identifier_state.ser(writer);
        self.title.ser(writer);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        Ok(Self {
            base: TransactionEventBase::de(reader)?,
            local_identifier_state: LocalIdentifierState::de(reader)?,
            title: String::de(reader)?,
        })
    }
}

impl PayloadType for TransactionFinalizedEvent {
    const TYPE_NAME: &'static str = "TransactionFinalizedEvent";
}

/// An interim, droppable view of a transaction still being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionSnapshotEvent {
    pub base: TransactionEventBase,
}

impl Serde for TransactionSnapshotEvent {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.base.ser(writer);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        Ok(Self {
            base: TransactionEventBase::de(reader)?,
        })
    }
}

impl PayloadType for TransactionSnapshotEvent {
    const TYPE_NAME: &'static str = "TransactionSnapshotEvent";
}

/// A peer asks this client to undo one of its transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionRejectedEvent {
    pub transaction_id: TransactionId,
}

impl TransactionRejectedEvent {
    pub fn new(transaction_id: Uuid) -> Self {
        Self { transaction_id }
    }
}

impl Serde for TransactionRejectedEvent {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_uuid(writer, &self.transaction_id);
    }

    fn de(reader: &mut dyn ByteRead) -> Result<Self, SerdeErr> {
        Ok(Self {
            transaction_id: read_uuid(reader)?,
        })
    }
}

impl PayloadType for TransactionRejectedEvent {
    const TYPE_NAME: &'static str = "TransactionRejectedEvent";
}

/// A transaction event ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionEvent {
    Finalized(TransactionFinalizedEvent),
    Snapshot(TransactionSnapshotEvent),
}

impl TransactionEvent {
    pub fn base(&self) -> &TransactionEventBase {
        match self {
            TransactionEvent::Finalized(event) => &event.base,
            TransactionEvent::Snapshot(event) => &event.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut TransactionEventBase {
        match self {
            TransactionEvent::Finalized(event) => &mut event.base,
            TransactionEvent::Snapshot(event) => &mut event.base,
        }
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, TransactionEvent::Snapshot(_))
    }

    /// The identifier table the event's object data was written with.
    /// Snapshots have none.
    pub fn identifier_table(&self) -> Option<LocalIdentifierTable> {
        match self {
            TransactionEvent::Finalized(event) => {
                Some(LocalIdentifierTable::from_state(&event.local_identifier_state))
            }
            TransactionEvent::Snapshot(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TransactionEvent::Finalized(_) => TransactionFinalizedEvent::TYPE_NAME,
            TransactionEvent::Snapshot(_) => TransactionSnapshotEvent::TYPE_NAME,
        }
    }
}

impl From<TransactionFinalizedEvent> for TransactionEvent {
    fn from(event: TransactionFinalizedEvent) -> Self {
        TransactionEvent::Finalized(event)
    }
}

impl From<TransactionSnapshotEvent> for TransactionEvent {
    fn from(event: TransactionSnapshotEvent) -> Self {
        TransactionEvent::Snapshot(event)
    }
}
