//! CLI module for Civic Gateway
//!
//! - `serve`: HTTP server (default)
//! - `city`: one city lookup through the configured cache
//! - `lines`: one transit status lookup through the configured cache

pub mod lookup;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Civic Gateway - cached access to public geographic and transit data
#[derive(Parser)]
#[command(name = "civic-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Look up a city and print the response envelope
    City {
        /// Free-text city name
        name: String,
    },

    /// Look up transit line statuses and print the response envelope
    Lines {
        /// Single line id; all lines when omitted
        line_id: Option<String>,

        /// Bypass the cache and overwrite stored statuses
        #[arg(long)]
        refresh: bool,
    },
}

/// Loads `.env` and layered configuration, then installs logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    Ok(config)
}
