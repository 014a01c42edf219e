//! Core error types for focusplan-core.
//!
//! The scheduling engine itself never fails: every path ends in a
//! `SchedulePlan`. Errors only come from structural validation of caller
//! input and from the collaborators around the engine (configuration,
//! the in-memory store, translator output).

use std::path::PathBuf;
use thiserror::Error;

use chrono::{NaiveDateTime, NaiveTime};

/// Core error type for focusplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Translator output that could not be turned into a task
    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/config directory could not be prepared
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Structural problems in caller input, detected before scheduling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Task title empty or too long
    #[error("Task {task}: title must be 1-{max} characters")]
    InvalidTitle { task: String, max: usize },

    /// Flexible task without a usable duration
    #[error("Task {task}: flexible tasks must have estimatedDuration > 0")]
    MissingDuration { task: String },

    /// Fixed task without both time fields
    #[error("Task {task}: fixed tasks must have startTime and endTime")]
    MissingFixedTimes { task: String },

    /// Invalid absolute time range
    #[error("{item}: end ({end}) must be after start ({start})")]
    InvalidTimeRange {
        item: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// Invalid time-of-day range
    #[error("{item}: end ({end}) must be after start ({start})")]
    InvalidTimeSlot {
        item: String,
        start: NaiveTime,
        end: NaiveTime,
    },

    /// Numeric value outside its allowed range
    #[error("Invalid value for '{field}': {value} (allowed {min}-{max})")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Errors from the in-memory record store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Task with ID {0} not found")]
    NotFound(String),

    #[error("Task with ID {0} already exists")]
    AlreadyExists(String),
}

/// Errors raised while turning translator output into a task.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// The translator call itself failed
    #[error("Translator unavailable: {0}")]
    Unavailable(String),

    /// No JSON object in the response
    #[error("No JSON object found in response: {0}")]
    NoJson(String),

    /// JSON present but malformed
    #[error("Failed to parse translator response: {0}")]
    Malformed(String),

    /// A required draft field is missing
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Draft carries an unknown task type
    #[error("Invalid task type: {0}")]
    InvalidType(String),

    /// Relative date keyword could not be resolved
    #[error("Cannot parse relative date: {0}")]
    UnresolvedDate(String),

    /// Hour/minute fields out of range
    #[error("Invalid clock value: {0}")]
    InvalidClock(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
