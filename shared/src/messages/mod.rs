mod exported_object;
mod message_flags;
mod session_event;
mod transaction_event;
mod uuid_serde;

pub use exported_object::{ExportedObject, ObjectData, SerializedPropertyData};
pub use message_flags::MessageFlags;
pub use session_event::{SessionEvent, SessionEventKind};
pub use transaction_event::{
    TransactionEvent, TransactionEventBase, TransactionFinalizedEvent, TransactionRejectedEvent,
    TransactionSnapshotEvent,
};
pub use uuid_serde::{read_uuid, write_uuid};
