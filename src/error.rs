//! Unified error types for smsxtract.
//!
//! This module provides a single [`ExtractError`] enum that covers every
//! failure the extraction pipeline can report.
//!
//! # Severity
//!
//! - [`DirectoryExists`](ExtractError::DirectoryExists) is the only
//!   *skippable* error: the file is left alone and the run continues.
//! - Everything else aborts the current file. The CLI treats that as fatal.
//!
//! Missing attributes in the export are never errors; they read as empty
//! strings.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for smsxtract operations.
///
/// # Example
///
/// ```rust
/// use smsxtract::error::Result;
/// use smsxtract::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExtractError>;

/// The error type for all smsxtract operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// An I/O error occurred while reading the export or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The output directory for an export already exists.
    ///
    /// Existing output is never overwritten; the file is skipped.
    #[error("Directory '{}' exists", path.display())]
    DirectoryExists {
        /// The output directory that was found
        path: PathBuf,
    },

    /// An output directory could not be created.
    #[error("Could not create directory '{}': {source}", path.display())]
    PermissionDenied {
        /// The directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// An attachment payload is not valid base64.
    ///
    /// Aborts the file rather than writing a corrupt attachment.
    #[error("Malformed attachment payload on line {line}: {source}")]
    MalformedPayload {
        /// 1-based line number of the payload line
        line: usize,
        /// The underlying decode error
        #[source]
        source: base64::DecodeError,
    },

    /// The input path cannot be used as an export.
    #[error("Invalid input '{}': {message}", path.display())]
    InvalidInput {
        /// The offending path
        path: PathBuf,
        /// Description of what's wrong
        message: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ExtractError {
    /// Creates a directory-exists error.
    pub fn directory_exists(path: impl Into<PathBuf>) -> Self {
        ExtractError::DirectoryExists { path: path.into() }
    }

    /// Creates a permission error for a directory that could not be made.
    pub fn permission_denied(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExtractError::PermissionDenied {
            path: path.into(),
            source,
        }
    }

    /// Creates a malformed payload error for a 1-based line number.
    pub fn malformed_payload(line: usize, source: base64::DecodeError) -> Self {
        ExtractError::MalformedPayload { line, source }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ExtractError::InvalidInput {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the run may continue with the next file.
    pub fn is_skippable(&self) -> bool {
        matches!(self, ExtractError::DirectoryExists { .. })
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ExtractError::Io(_))
    }

    /// Returns `true` if this is a payload decoding error.
    pub fn is_malformed_payload(&self) -> bool {
        matches!(self, ExtractError::MalformedPayload { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
