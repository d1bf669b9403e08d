//! Unified error types for the crate.
//!
//! One enum covers configuration, validation, lookup, and database failures.
//! The HTTP layer maps each variant to a status code; see `api`.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or parsing failed
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable detail
        message: String,
    },

    /// A request payload failed a field check
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable detail
        message: String,
    },

    /// A row looked up by primary key does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name, e.g. "product"
        entity: &'static str,
        /// The id that missed
        id: i32,
    },

    /// Underlying store operation failed
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error, e.g. binding the listener
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a missing row.
    pub const fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }
}
