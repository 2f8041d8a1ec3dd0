//! Core error types for parchipay-core.
//!
//! Refusals (invalid operation requests) are deliberately separate from
//! hard errors: a refused draw or payment toggle is an expected outcome the
//! caller reports to the user, never a crash.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for parchipay-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Durable store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Collaborator-related errors (rules generation, message handoff)
    #[error("Collaborator error for '{service}': {message}")]
    Collaborator { service: String, message: String },

    /// An operation request was refused
    #[error("Refused: {0}")]
    Refused(#[from] Refusal),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An invalid operation request, rejected without side effects.
///
/// The committee value the operation was applied to is left untouched;
/// callers surface the refusal and carry on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Refusal {
    /// No member is eligible for the current cycle's draw
    #[error("No members are eligible for this cycle's draw")]
    NoEligibleMembers,

    /// A draw is already running for this committee
    #[error("A draw is already in progress")]
    DrawInFlight,

    /// Draw history already covers the committee's full duration
    #[error("All {duration} draws have been held for this committee")]
    DurationExhausted { duration: u32 },

    /// The proposed winner failed the eligibility re-check
    #[error("Member '{user_id}' is not eligible to win this cycle")]
    WinnerNotEligible { user_id: String },

    /// Committee lookup failed
    #[error("No committee with id '{id}'")]
    CommitteeNotFound { id: String },

    /// Member lookup failed
    #[error("No member with user id '{user_id}' in this committee")]
    MemberNotFound { user_id: String },
}

/// Durable store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Store is locked by another process
    #[error("Store is locked")]
    Locked,
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
