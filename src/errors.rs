//! Error types for the svgnotes application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur during note management operations.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the svgnotes application.
#[derive(Error, Debug)]
pub enum NoteError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: u64 },

    /// Operation requires at least one stored note.
    #[error("Note store is empty")]
    StoreEmpty,

    /// The notes directory exists but cannot be accessed.
    #[error("Note store unavailable at {path}: {message}")]
    StoreUnavailable { path: PathBuf, message: String },

    /// An existing record failed to decode - on-disk corruption or a
    /// document the decoder does not recognize.
    #[error("Malformed record at {path}: {message}")]
    MalformedRecord { path: PathBuf, message: String },

    /// Encoding succeeded but persisting the record failed.
    #[error("Failed to write record {path}: {message}")]
    WriteFailure { path: PathBuf, message: String },

    /// Caller-supplied fields failed validation.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// for mutex lock acquisition issues
    #[error("{message}")]
    LockAcquisitionFailed { message: String },
}
