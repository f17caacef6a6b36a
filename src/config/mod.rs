//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, GeocodingConfig, HttpSettings, LogFormat, LoggingConfig, ServerConfig,
    StorageSettings, TransitConfig,
};
