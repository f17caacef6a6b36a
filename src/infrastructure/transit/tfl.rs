use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::cache::normalize_key;
use crate::domain::transit::{FetchedLine, LineFields, DEFAULT_REASON, DEFAULT_STATUS};
use crate::domain::{DomainError, ProviderResult, TransitStatusProvider};
use crate::infrastructure::http::HttpClientTrait;

pub const DEFAULT_TFL_BASE_URL: &str = "https://api.tfl.gov.uk";
const PROVIDER: &str = "tfl";

/// Transport for London line status provider
#[derive(Debug)]
pub struct TflProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
    modes: Vec<String>,
    city: String,
    app_key: Option<String>,
}

impl<C: HttpClientTrait> TflProvider<C> {
    pub fn new(client: C, modes: Vec<String>, city: impl Into<String>) -> Self {
        Self::with_base_url(client, DEFAULT_TFL_BASE_URL, modes, city)
    }

    pub fn with_base_url(
        client: C,
        base_url: impl Into<String>,
        modes: Vec<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            modes: modes
                .into_iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            city: city.into(),
            app_key: None,
        }
    }

    pub fn with_app_key(mut self, app_key: Option<String>) -> Self {
        self.app_key = app_key.filter(|k| !k.trim().is_empty());
        self
    }

    fn base(&self) -> Result<Url, DomainError> {
        if self.base_url.is_empty() {
            return Err(DomainError::configuration("TfL base URL is not configured"));
        }

        Url::parse(&self.base_url).map_err(|e| {
            DomainError::configuration(format!("Invalid TfL base URL '{}': {}", self.base_url, e))
        })
    }

    fn url_with_segments(&self, segments: &[&str]) -> Result<String, DomainError> {
        let mut url = self.base()?;

        url.path_segments_mut()
            .map_err(|_| {
                DomainError::configuration(format!("TfL base URL '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url.to_string())
    }

    fn bulk_url(&self) -> Result<String, DomainError> {
        if self.modes.is_empty() {
            return Err(DomainError::configuration("No TfL transport modes configured"));
        }

        let modes = self.modes.join(",");
        self.url_with_segments(&["Line", "Mode", &modes, "Status"])
    }

    fn query(&self) -> Vec<(&str, &str)> {
        match self.app_key.as_deref() {
            Some(key) => vec![("app_key", key)],
            None => Vec::new(),
        }
    }

    fn map_line(&self, line: TflLine) -> FetchedLine {
        let status = line.line_statuses.into_iter().next();

        let (status, severity, reason) = match status {
            Some(s) => (
                s.status_severity_description
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                s.status_severity.unwrap_or(0),
                s.reason
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_REASON.to_string()),
            ),
            None => (DEFAULT_STATUS.to_string(), 0, DEFAULT_REASON.to_string()),
        };

        FetchedLine {
            line_id: normalize_key(&line.id),
            fields: LineFields {
                line_name: line.name,
                mode: line.mode_name,
                status,
                severity,
                reason,
                city: self.city.clone(),
            },
        }
    }

    fn parse_lines(json: serde_json::Value) -> Result<Vec<TflLine>, DomainError> {
        let lines = match json {
            serde_json::Value::Array(_) => serde_json::from_value::<Vec<TflLine>>(json),
            other => serde_json::from_value::<TflLine>(other).map(|line| vec![line]),
        };

        lines.map_err(|e| DomainError::internal(format!("Malformed TfL payload: {}", e)))
    }

    async fn get(&self, url: &str) -> Result<ProviderResult<Vec<TflLine>>, DomainError> {
        match self.client.get_json(url, &self.query()).await {
            Ok(json) => {
                let lines = Self::parse_lines(json)?;

                if lines.is_empty() {
                    Ok(ProviderResult::NotFound)
                } else {
                    Ok(ProviderResult::Found(lines))
                }
            }
            Err(DomainError::NotFound { .. }) => Ok(ProviderResult::NotFound),
            Err(DomainError::Provider { message, .. }) => {
                warn!(url = %url, error = %message, "TfL request failed");
                Ok(ProviderResult::ProviderError(message))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> TransitStatusProvider for TflProvider<C> {
    async fn fetch_all_lines(&self) -> Result<ProviderResult<Vec<FetchedLine>>, DomainError> {
        let url = self.bulk_url()?;
        debug!(modes = ?self.modes, "Querying TfL line statuses");

        Ok(match self.get(&url).await? {
            ProviderResult::Found(lines) => {
                ProviderResult::Found(lines.into_iter().map(|l| self.map_line(l)).collect())
            }
            ProviderResult::NotFound => ProviderResult::NotFound,
            ProviderResult::ProviderError(detail) => ProviderResult::ProviderError(detail),
        })
    }

    async fn fetch_line(&self, line_id: &str) -> Result<ProviderResult<FetchedLine>, DomainError> {
        let url = self.url_with_segments(&["Line", line_id])?;

        // `/Line/` with no id is a different resource
        if line_id.is_empty() {
            return Ok(ProviderResult::NotFound);
        }

        debug!(line_id = %line_id, "Querying TfL line");

        Ok(match self.get(&url).await? {
            ProviderResult::Found(lines) => match lines.into_iter().next() {
                Some(line) => ProviderResult::Found(self.map_line(line)),
                None => ProviderResult::NotFound,
            },
            ProviderResult::NotFound => ProviderResult::NotFound,
            ProviderResult::ProviderError(detail) => ProviderResult::ProviderError(detail),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TflLine {
    id: String,
    name: String,
    mode_name: String,
    #[serde(default)]
    line_statuses: Vec<TflLineStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TflLineStatus {
    #[serde(default)]
    status_severity: Option<i32>,
    #[serde(default)]
    status_severity_description: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}
