//! Unified application error type.
//! Every module (legacy, db, core, cli) returns AppError so the migration
//! entry point can map any failure onto a single nonzero status.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Migration taxonomy
    // ---------------------------
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Cannot convert legacy record {record}: {reason}")]
    Transform { record: String, reason: String },

    #[error("Unreadable legacy store: {0}")]
    LegacyStore(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid duration (expected HH:MM:SS): {0}")]
    InvalidDuration(String),

    #[error("Invalid date format (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid time format (expected HH:MM): {0}")]
    InvalidTime(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("No time entry with id {0}")]
    EntryNotFound(i64),

    #[error("Entry #{id} is from {date}; only entries of the current day can be edited")]
    EntryLocked { id: i64, date: String },
}

impl AppError {
    /// Wrap a filesystem failure together with the operation and path it hit.
    pub fn filesystem(op: &str, path: &std::path::Path, err: io::Error) -> Self {
        AppError::Filesystem(format!("{op} {}: {err}", path.display()))
    }
}

pub type AppResult<T> = Result<T, AppError>;
