//! Transit line record and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::cache::CachedRecord;

pub const DEFAULT_STATUS: &str = "Unknown";
pub const DEFAULT_REASON: &str = "No issues reported";

/// Status metadata for one line, as mapped from the transit provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFields {
    pub line_name: String,
    pub mode: String,
    pub status: String,
    /// Provider-defined scale, opaque here
    #[serde(default)]
    pub severity: i32,
    pub reason: String,
    pub city: String,
}

/// A line as returned by the provider, keyed by its normalized id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedLine {
    pub line_id: String,
    pub fields: LineFields,
}

/// A cached transit line status, keyed by normalized line id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitLineRecord {
    line_id: String,
    #[serde(flatten)]
    fields: LineFields,
    queried_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TransitLineRecord {
    pub fn line_id(&self) -> &str {
        &self.line_id
    }

    pub fn line_name(&self) -> &str {
        &self.fields.line_name
    }

    pub fn mode(&self) -> &str {
        &self.fields.mode
    }

    pub fn status(&self) -> &str {
        &self.fields.status
    }

    pub fn severity(&self) -> i32 {
        self.fields.severity
    }

    pub fn reason(&self) -> &str {
        &self.fields.reason
    }

    pub fn city(&self) -> &str {
        &self.fields.city
    }
}

impl CachedRecord for TransitLineRecord {
    type Fields = LineFields;

    fn key(&self) -> &str {
        &self.line_id
    }

    fn fields(&self) -> &LineFields {
        &self.fields
    }

    fn queried_at(&self) -> DateTime<Utc> {
        self.queried_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn assemble(
        key: String,
        fields: LineFields,
        queried_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            line_id: key,
            fields,
            queried_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serialization() {
        let now = Utc::now();
        let record = TransitLineRecord::assemble(
            "central".to_string(),
            LineFields {
                line_name: "Central".to_string(),
                mode: "tube".to_string(),
                status: "Good Service".to_string(),
                severity: 10,
                reason: DEFAULT_REASON.to_string(),
                city: "London".to_string(),
            },
            now,
            now,
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["lineId"], "central");
        assert_eq!(json["status"], "Good Service");
        assert_eq!(json["severity"], 10);

        let back: TransitLineRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
