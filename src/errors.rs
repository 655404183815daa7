/*!
 * Error types for the vidmux application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when probing a media file for its tracks
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probe tool could not be started
    #[error("Failed to run {tool}: {message}")]
    Launch {
        /// Name or path of the probe executable
        tool: String,
        /// Underlying OS error
        message: String,
    },

    /// The probe tool ran but reported failure
    #[error("Probe failed for {path}: {message}")]
    Failed {
        /// File that was probed
        path: PathBuf,
        /// Filtered stderr of the tool
        message: String,
    },

    /// The probe output could not be understood
    #[error("Unreadable probe output for {path}: {message}")]
    Unreadable {
        /// File that was probed
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

/// Errors that can occur while parsing a caption (SRT) document
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CaptionError {
    /// The caption text does not follow the SRT block grammar
    #[error("Malformed caption at line {line}: {message}")]
    Malformed {
        /// 1-based line number of the offending line
        line: usize,
        /// What was expected
        message: String,
    },
}

/// Errors for an invalid timestamp shift request
#[derive(Error, Debug, PartialEq)]
pub enum ShiftError {
    /// The delta is NaN or infinite
    #[error("Invalid shift: {0} is not a finite number of seconds")]
    NotFinite(f64),
}

/// Errors that can occur while writing results
#[derive(Error, Debug)]
pub enum OutputError {
    /// The destination could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The backup copy of an input file could not be created
    #[error("Failed to create backup {backup} of {path}: {source}")]
    Backup {
        /// Original file
        path: PathBuf,
        /// Intended backup location
        backup: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Results could not be serialized
    #[error("Failed to serialize output: {0}")]
    Serialize(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the probe collaborator
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Error from caption parsing
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Error from an invalid shift request
    #[error("Shift error: {0}")]
    Shift(#[from] ShiftError),

    /// Error while writing output
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
