//! Error handling utilities for the daylog engine.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the engine, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Parse-level irregularities in a day file (unknown bullet text, a missing
//! Journal section) are not errors: they are recovered inside the document
//! layer. Only document contract violations and storage-boundary failures
//! surface here.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents failures of an operation on a single parsed day file.
///
/// # Examples
///
/// ```
/// use daylog::errors::DocumentError;
///
/// let error = DocumentError::IndexOutOfRange { index: 3, len: 2 };
/// assert!(format!("{}", error).contains("index 3"));
/// assert!(format!("{}", error).contains("2 entries"));
/// ```
#[derive(Debug, Error)]
pub enum DocumentError {
    /// An update or delete referenced a position absent from the current parse.
    #[error("Entry index {index} is out of range: the journal has {len} entries. The file may have been edited; reload it and try again.")]
    IndexOutOfRange {
        /// The requested positional index
        index: usize,
        /// Number of entries in the current parse
        len: usize,
    },

    /// The configured template rendered into something that is not a usable document.
    #[error("Template error: {0}. Check the configured note template.")]
    Template(String),

    /// The day file is not UTF-8 text, so only appending to it is safe.
    #[error("Day file {path} is not valid UTF-8 text; it was left untouched.")]
    NotText {
        /// The path of the undecodable day file
        path: PathBuf,
    },
}

/// Represents failures at the persistence boundary.
///
/// # Examples
///
/// ```
/// use daylog::errors::StorageError;
/// use std::path::PathBuf;
///
/// let error = StorageError::ConcurrentModification {
///     path: PathBuf::from("/notes/2025-12-29.md"),
/// };
/// assert!(format!("{}", error).contains("changed on disk"));
/// assert!(format!("{}", error).contains("2025-12-29.md"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// No journal directory is configured, or it cannot be opened.
    #[error("Storage unavailable: no journal directory is configured or it cannot be opened. Set DAYLOG_DIR to an absolute directory path.")]
    Unavailable,

    /// The file changed between the read and the write of a read-modify-write.
    #[error("Day file {path} changed on disk while it was being updated. Nothing was written; reload and try again.")]
    ConcurrentModification {
        /// The path of the day file that changed
        path: PathBuf,
    },

    /// Persisting a day file failed; the previous content is left in place.
    #[error("Failed to write day file {path}: {source}. Please check file permissions and free disk space.")]
    WriteFailed {
        /// The path of the day file being written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in the daylog engine.
///
/// Note: This type does not implement `Clone` to avoid losing error context when
/// cloning `std::io::Error` values.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use daylog::errors::AppError;
///
/// let error = AppError::Config("Journal directory must be an absolute path".to_string());
/// assert_eq!(
///     format!("{}", error),
///     "Configuration error: Journal directory must be an absolute path"
/// );
/// ```
///
/// Converting from an IO error:
/// ```
/// use daylog::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors from operations on a parsed day file.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Errors from loading or persisting day files.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A background worker task failed before producing a result.
    #[error("Worker task failed: {0}")]
    Task(String),
}

impl AppError {
    /// True when the error is the `IndexOutOfRange` document error.
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(
            self,
            AppError::Document(DocumentError::IndexOutOfRange { .. })
        )
    }

    /// True when the error is a detected concurrent modification.
    pub fn is_concurrent_modification(&self) -> bool {
        matches!(
            self,
            AppError::Storage(StorageError::ConcurrentModification { .. })
        )
    }
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use daylog::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Config("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
