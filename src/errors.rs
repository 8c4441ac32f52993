//! Unified error types for the planner service.

use thiserror::Error;

/// Errors raised by the core, configuration and web layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any failure reported by the persistence store, including constraint violations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The row does not exist or belongs to another owner
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name, e.g. `"task"`
        entity: &'static str,
        /// Requested primary key
        id: i64,
    },

    /// Input rejected by a domain rule
    #[error("Invalid input: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// Amount is not a decimal with at most two fractional digits
    #[error("Invalid amount: {value}")]
    InvalidAmount {
        /// The offending input
        value: String,
    },

    /// Time-of-day is not in 24-hour `HH:MM` form
    #[error("Invalid time '{value}': expected HH:MM")]
    InvalidTime {
        /// The offending input
        value: String,
    },

    /// Deletion blocked because transactions still reference the row
    #[error("{entity} {id} is still referenced by {references} transaction(s)")]
    Protected {
        /// Entity name, e.g. `"account"`
        entity: &'static str,
        /// Primary key of the protected row
        id: i64,
        /// Number of referencing transactions
        references: u64,
    },

    /// HTML template failed to render
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
