//! Transit domain
//!
//! Line status snapshots cached per normalized line id.

mod entity;

pub use entity::{FetchedLine, LineFields, TransitLineRecord, DEFAULT_REASON, DEFAULT_STATUS};
