//! Cached record traits

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// A record that lives in a cache-aside store, keyed by a normalized string.
///
/// The non-key payload is split out as `Fields` so an upsert can replace the
/// whole payload while the store owns the key and the timestamps.
pub trait CachedRecord: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Everything except the key and the timestamps
    type Fields: Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static;

    /// Returns the normalized lookup key
    fn key(&self) -> &str;

    /// Returns the record payload
    fn fields(&self) -> &Self::Fields;

    /// When the key was first fetched
    fn queried_at(&self) -> DateTime<Utc>;

    /// When the payload was last written
    fn updated_at(&self) -> DateTime<Utc>;

    /// Assembles a record from its parts
    fn assemble(
        key: String,
        fields: Self::Fields,
        queried_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self;
}
