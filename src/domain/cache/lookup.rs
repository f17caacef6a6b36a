//! Tagged outcome of a cache-aside lookup

use serde::Serialize;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Provenance {
    #[serde(rename = "local cache")]
    LocalCache,
    #[serde(rename = "remote (fresh)")]
    RemoteFresh,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocalCache => "local cache",
            Self::RemoteFresh => "remote (fresh)",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a resolver lookup
///
/// Expected outcomes (absence, provider down, store down, missing config) are
/// variants here rather than errors, so callers branch on the kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Served from the store; no remote call was made
    Hit(T),
    /// Fetched remotely and written to the store.
    ///
    /// `write_failures` counts records that could not be persisted (bulk only).
    Fetched { value: T, write_failures: usize },
    /// Neither the store nor the provider knows the key
    NotFound,
    /// The provider call failed; nothing was written
    RemoteError(String),
    /// The store failed. `unsaved` holds data that was fetched but not persisted.
    StoreError { message: String, unsaved: Option<T> },
    /// The provider is not configured; no network call was attempted
    ConfigError(String),
}

impl<T> Lookup<T> {
    /// Provenance of the value, if the lookup produced one
    pub fn provenance(&self) -> Option<Provenance> {
        match self {
            Self::Hit(_) => Some(Provenance::LocalCache),
            Self::Fetched { .. } => Some(Provenance::RemoteFresh),
            Self::StoreError {
                unsaved: Some(_), ..
            } => Some(Provenance::RemoteFresh),
            _ => None,
        }
    }

    /// The resolved value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Hit(value) | Self::Fetched { value, .. } => Some(value),
            Self::StoreError { unsaved, .. } => unsaved.as_ref(),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Hit(value) | Self::Fetched { value, .. } => Some(value),
            Self::StoreError { unsaved, .. } => unsaved,
            _ => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_labels() {
        assert_eq!(Provenance::LocalCache.to_string(), "local cache");
        assert_eq!(
            serde_json::to_string(&Provenance::RemoteFresh).unwrap(),
            "\"remote (fresh)\""
        );
    }

    #[test]
    fn test_value_access() {
        let hit: Lookup<u32> = Lookup::Hit(1);
        assert_eq!(hit.value(), Some(&1));
        assert_eq!(hit.provenance(), Some(Provenance::LocalCache));

        let unsaved: Lookup<u32> = Lookup::StoreError {
            message: "down".into(),
            unsaved: Some(2),
        };
        assert_eq!(unsaved.provenance(), Some(Provenance::RemoteFresh));
        assert_eq!(unsaved.into_value(), Some(2));

        let missing: Lookup<u32> = Lookup::NotFound;
        assert!(missing.is_not_found());
        assert_eq!(missing.value(), None);
        assert_eq!(missing.provenance(), None);
    }
}
