//! Application settings loading.
//!
//! Settings come from an optional `quickbite.toml` file with a `[server]`
//! table, overridden by the `DATABASE_URL` and `BIND_ADDRESS` environment
//! variables. Everything has a working default so the server starts with no
//! configuration at all.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;

/// Configuration file read from the working directory, when present.
const CONFIG_FILE: &str = "quickbite.toml";

const DEFAULT_DATABASE_URL: &str = "sqlite://data/quickbite.sqlite?mode=rwc";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Connection string handed to SeaORM
    pub database_url: String,
    /// Address the HTTP listener binds to
    pub bind_address: SocketAddr,
}

/// Shape of `quickbite.toml`.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    database_url: Option<String>,
    bind_address: Option<String>,
}

/// Loads the application configuration: file values first, environment
/// variables on top, defaults underneath.
///
/// # Errors
/// Returns [`Error::Config`] when the file exists but cannot be parsed, or
/// when the resolved bind address is not a valid socket address.
pub fn load_app_configuration() -> Result<AppConfig> {
    let file = match std::fs::read_to_string(CONFIG_FILE) {
        Ok(contents) => toml::from_str(&contents).map_err(|e| Error::Config {
            message: format!("failed to parse {CONFIG_FILE}: {e}"),
        })?,
        Err(_) => {
            tracing::debug!("no {CONFIG_FILE} found, using defaults");
            FileConfig::default()
        }
    };

    resolve(
        file,
        std::env::var("DATABASE_URL").ok(),
        std::env::var("BIND_ADDRESS").ok(),
    )
}

fn resolve(
    file: FileConfig,
    env_database_url: Option<String>,
    env_bind_address: Option<String>,
) -> Result<AppConfig> {
    let database_url = env_database_url
        .or(file.server.database_url)
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

    let bind_address = env_bind_address
        .or(file.server.bind_address)
        .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
    let bind_address = bind_address.parse().map_err(|e| Error::Config {
        message: format!("invalid bind address '{bind_address}': {e}"),
    })?;

    Ok(AppConfig {
        database_url,
        bind_address,
    })
}
