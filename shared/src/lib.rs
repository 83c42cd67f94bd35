//! # Tandem Shared
//! Object model, sync archives, payload codec and transaction events shared
//! by tandem clients and the tools that store their transactions.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use tandem_serde::{
    read_byte_array, write_byte_array, ArchiveReader, ArchiveWriter, ByteRead, ByteWrite,
    IdentifierReader, IdentifierSource, IdentifierWriter, LocalIdentifierState,
    LocalIdentifierTable, Name, Serde, SerdeErr, UnsignedVariableInteger, HARDCODED_NAMES,
    MAX_NETWORKED_HARDCODED_NAME,
};

mod archive;
mod config;
mod filter;
mod ledger;
mod messages;
mod object;
mod payload;
mod scratchpad;
mod types;
mod wrapping_number;

pub use archive::{
    resolve_pending_loads, ObjectRef, PropertyFilter, SyncObjectReader, SyncObjectWriter,
    WorldRemapper, SKIPPED_ASSET_MARKER,
};
pub use config::{FullUpdatePolicy, SyncConfig};
pub use filter::{classify_object, TransactionClassFilter, TransactionFilterResult};
pub use ledger::{
    deserialize_transaction, serialize_transaction, LedgerError, TransactionLedger,
    TransientTransactionLedger,
};
pub use messages::{
    read_uuid, write_uuid, ExportedObject, MessageFlags, ObjectData, SerializedPropertyData,
    SessionEvent, SessionEventKind, TransactionEvent, TransactionEventBase,
    TransactionFinalizedEvent, TransactionRejectedEvent, TransactionSnapshotEvent,
};
pub use object::{
    exported_property, find_property, is_valid_long_package_name, join_path, object_id_of,
    object_path_depth, outer_chain, outermost, package_name_of, root_properties, ObjectFlags,
    ObjectId, ObjectKey, ObjectNotification, ObjectPathError, ObjectTransactedEvent,
    ObjectTransactedKind, ObjectWorld, PropertyChangeType, PropertyDescriptor, PropertyFlags,
    SyncObject, TransactionAnnotation, TransactionContext, TransactionState, UndoHistory,
    MAX_OUTER_CHAIN_DEPTH, TRANSIENT_PACKAGE_NAME,
};
pub use payload::{
    CompressionConfig, CompressionMode, PayloadCompressor, PayloadError, PayloadType,
    SerializedPayload, TypedPayload, DEFAULT_COMPRESSION_LEVEL,
};
pub use scratchpad::{transaction_scratchpad_key, Scratchpad};
pub use types::{EndpointId, OperationId, TransactionId, TransactionIndex, TransactionUpdateIndex};
pub use wrapping_number::{sequence_greater_than, sequence_less_than, wrapping_diff};

pub use uuid::Uuid;
