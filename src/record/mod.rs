//! Records and the caller-owned collection they are searched from.

pub mod collection;
#[allow(clippy::module_inception)]
pub mod record;

pub use collection::{CollectionStats, IndexMetadata, RecordCollection};
pub use record::{Record, RecordBuilder};
