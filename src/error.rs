// src/error.rs

//! Unified error handling for the archiver.

use std::fmt;

use thiserror::Error;

/// Result type alias for archiver operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The index page has no link container
    #[error("Index container '{selector}' not found")]
    MissingContainer { selector: String },

    /// A detail page lacks a required field
    #[error("Required field '{field}' not found")]
    MissingFields { field: String },

    /// Fetching a page failed (transport error or non-success status)
    #[error("Fetch failed for {url}: {message}")]
    FetchFailed { url: String, message: String },

    /// The persistence layer could not store the archive
    #[error("Failed to write archive '{name}': {message}")]
    WriteFailed { name: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or used
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Zip encoding failed
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Coarse classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingContainer,
    MissingFields,
    FetchFailed,
    WriteFailed,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MissingContainer => "missing-container",
            ErrorKind::MissingFields => "missing-fields",
            ErrorKind::FetchFailed => "fetch-failed",
            ErrorKind::WriteFailed => "write-failed",
            ErrorKind::Other => "error",
        };
        f.write_str(name)
    }
}

impl AppError {
    /// Create a missing container error.
    pub fn missing_container(selector: impl Into<String>) -> Self {
        Self::MissingContainer {
            selector: selector.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingFields {
            field: field.into(),
        }
    }

    /// Create a fetch error with the offending URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::FetchFailed {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a write error for the given archive name.
    pub fn write_failed(name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::WriteFailed {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MissingContainer { .. } => ErrorKind::MissingContainer,
            AppError::MissingFields { .. } => ErrorKind::MissingFields,
            AppError::FetchFailed { .. } | AppError::Http(_) => ErrorKind::FetchFailed,
            AppError::WriteFailed { .. } => ErrorKind::WriteFailed,
            _ => ErrorKind::Other,
        }
    }
}
