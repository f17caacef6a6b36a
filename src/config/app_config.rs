use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};

/// Env var read when `geocoding.username` is not set
const GEONAMES_USERNAME_VAR: &str = "GEONAMES_USERNAME";
/// Env var read when `transit.app_key` is not set
const TFL_APP_KEY_VAR: &str = "TFL_APP_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub geocoding: GeocodingConfig,
    pub transit: TransitConfig,
    /// Absent means persistence is disabled
    pub storage: Option<StorageSettings>,
    pub http: HttpSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// GeoNames settings. The username is the account credential.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub base_url: String,
    pub username: Option<String>,
}

/// TfL settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransitConfig {
    pub base_url: String,
    pub modes: Vec<String>,
    /// City label stamped on every line record
    pub city: String,
    pub app_key: Option<String>,
}

/// PostgreSQL connection parameters
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// `postgres` (default), `memory` or `disabled`
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_pg_port")]
    pub port: u16,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

fn default_pg_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3005,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: crate::infrastructure::geocoding::DEFAULT_GEONAMES_BASE_URL.to_string(),
            username: None,
        }
    }
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            base_url: crate::infrastructure::transit::DEFAULT_TFL_BASE_URL.to_string(),
            modes: vec![
                "tube".to_string(),
                "dlr".to_string(),
                "overground".to_string(),
            ],
            city: "London".to_string(),
            app_key: None,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl StorageSettings {
    /// Builds `postgres://[user[:password]@]host:port/database`
    pub fn connection_url(&self) -> Result<String, DomainError> {
        let host = non_blank(self.host.as_deref())
            .ok_or_else(|| DomainError::configuration("storage.host is required"))?;
        let database = non_blank(self.database.as_deref())
            .ok_or_else(|| DomainError::configuration("storage.database is required"))?;

        let credentials = match (non_blank(self.user.as_deref()), non_blank(self.password.as_deref())) {
            (Some(user), Some(password)) => format!("{}:{}@", user, password),
            (Some(user), None) => format!("{}@", user),
            (None, _) => String::new(),
        };

        Ok(format!(
            "postgres://{}{}:{}/{}",
            credentials, host, self.port, database
        ))
    }

    pub fn to_storage_config(&self) -> Result<StorageConfig, DomainError> {
        let storage_type = match self.backend.as_deref() {
            Some(raw) => StorageType::parse(raw).ok_or_else(|| {
                DomainError::configuration(format!("Unknown storage backend '{}'", raw))
            })?,
            None => StorageType::Postgres,
        };

        Ok(match storage_type {
            StorageType::Disabled => StorageConfig::Disabled,
            StorageType::InMemory => StorageConfig::InMemory,
            StorageType::Postgres => StorageConfig::Postgres(
                PostgresConfig::new(self.connection_url()?)
                    .with_max_connections(self.max_connections),
            ),
        })
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("transit.modes")
                    .try_parsing(true),
            )
            .build()?;

        let mut app: AppConfig = config.try_deserialize()?;
        app.apply_conventional_env(|name| std::env::var(name).ok());
        Ok(app)
    }

    /// Fills provider credentials from their conventional env vars when unset
    fn apply_conventional_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if non_blank(self.geocoding.username.as_deref()).is_none() {
            self.geocoding.username = lookup(GEONAMES_USERNAME_VAR).filter(|v| !v.trim().is_empty());
        }

        if non_blank(self.transit.app_key.as_deref()).is_none() {
            self.transit.app_key = lookup(TFL_APP_KEY_VAR).filter(|v| !v.trim().is_empty());
        }
    }

    /// Storage selection; no `storage` section disables persistence
    pub fn storage_config(&self) -> Result<StorageConfig, DomainError> {
        match &self.storage {
            Some(settings) => settings.to_storage_config(),
            None => Ok(StorageConfig::Disabled),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
