//! Cache-aside domain - keys, records, stores and lookup outcomes

mod key;
mod lookup;
mod record;
mod store;

pub use key::normalize_key;
pub use lookup::{Lookup, Provenance};
pub use record::CachedRecord;
pub use store::RecordStore;

#[cfg(test)]
pub use store::mock::MockRecordStore;
