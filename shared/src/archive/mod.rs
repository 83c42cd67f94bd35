mod object_ref;
mod property_filter;
mod reader;
mod remapper;
mod writer;

pub use object_ref::{ObjectRef, SKIPPED_ASSET_MARKER};
pub use property_filter::PropertyFilter;
pub use reader::{resolve_pending_loads, SyncObjectReader};
pub use remapper::WorldRemapper;
pub use writer::SyncObjectWriter;
