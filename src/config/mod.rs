/// Database connection and schema bootstrap
pub mod database;

/// Application settings from quickbite.toml and environment variables
pub mod settings;

pub use settings::AppConfig;
