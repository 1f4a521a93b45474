//! Core error types for renewal-core.
//!
//! "Not found" is not an error here: reads return `Option`, deletes return
//! `bool`. Everything below is a rejected or failed operation.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::EntityKind;

/// Core error type for renewal-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid field values on a create or update
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Uniqueness or referential integrity would be broken
    #[error("Constraint violation: {0}")]
    Constraint(#[from] ConstraintViolation),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Writes rejected because they would break a uniqueness or foreign-key rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    #[error("policy number '{0}' is already in use")]
    DuplicatePolicyNumber(String),

    #[error("client {0} does not exist")]
    UnknownClient(String),

    #[error("{kind} {id} still owns {dependents} dependent record(s)")]
    HasDependents {
        kind: EntityKind,
        id: String,
        dependents: usize,
    },

    #[error("policy {policy_id} already has a pending reminder")]
    DuplicatePendingReminder { policy_id: String },

    /// A storage-level constraint fired that the explicit checks did not catch.
    #[error("storage constraint failed: {0}")]
    Storage(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Could not determine where to keep data
    #[error("Cannot resolve data directory: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("'{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("start_date ({start}) must not be after end_date ({end})")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("premium_amount must be a non-negative number, got {0}")]
    InvalidPremium(f64),

    /// Dates are kept as `YYYY-MM-DD` text, so only four-digit years are stored.
    #[error("date {0} is outside the supported range 0001-01-01..=9999-12-31")]
    DateOutOfRange(chrono::NaiveDate),

    #[error("unknown reminder status '{0}' (expected pending, sent or acknowledged)")]
    InvalidStatus(String),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(e, msg) = &err {
            if e.code == rusqlite::ErrorCode::ConstraintViolation {
                let detail = msg.clone().unwrap_or_else(|| e.to_string());
                return CoreError::Constraint(ConstraintViolation::Storage(detail));
            }
        }
        CoreError::Database(DatabaseError::from(err))
    }
}

impl CoreError {
    /// True when the error is a constraint rejection rather than a failure.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, CoreError::Constraint(_))
    }

    pub fn constraint(&self) -> Option<&ConstraintViolation> {
        match self {
            CoreError::Constraint(c) => Some(c),
            _ => None,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
