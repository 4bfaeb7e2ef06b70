//! Error types for compendium.
//!
//! This module defines the error type shared by the canvas engine, the export
//! bundler and the preference store. Recoverable conditions (an undecodable
//! artifact, a failed snapshot, a busy exporter) are not errors;
//! see the individual modules for how those are reported.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for compendium operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Preference Store Errors ===
    /// Failed to open or create the preference database.
    #[error("failed to open preference database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A preference query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run preference schema migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Canvas Errors ===
    /// A brush color string could not be parsed.
    #[error("invalid color '{value}': expected #rgb or #rrggbb")]
    InvalidColor {
        /// The rejected input.
        value: String,
    },

    // === Export Errors ===
    /// The record source could not produce the record set.
    #[error("failed to fetch records: {message}")]
    RecordSource {
        /// Description of what went wrong.
        message: String,
    },

    /// Writing the CSV view failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Packaging the archive failed.
    #[error("archive generation failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for compendium operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a new record source error.
    #[must_use]
    pub fn record_source(message: impl Into<String>) -> Self {
        Self::RecordSource {
            message: message.into(),
        }
    }

    /// Create an invalid color error.
    #[must_use]
    pub fn invalid_color(value: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
        }
    }

    /// Check if this error came from loading or validating configuration.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigLoad(_) | Self::ConfigValidation { .. })
    }

    /// Check if this error aborted archive generation.
    #[must_use]
    pub fn is_archive_error(&self) -> bool {
        matches!(self, Self::Archive(_) | Self::Csv(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_record_source_error() {
        let err = Error::record_source("connection refused");
        assert_eq!(
            err.to_string(),
            "failed to fetch records: connection refused"
        );
    }

    #[test]
    fn test_invalid_color_display() {
        let err = Error::invalid_color("teal");
        let msg = err.to_string();
        assert!(msg.contains("teal"));
        assert!(msg.contains("#rrggbb"));
    }

    #[test]
    fn test_is_config_error() {
        let err = Error::ConfigValidation {
            message: "height must be greater than 0".to_string(),
        };
        assert!(err.is_config_error());
        assert!(!Error::internal("x").is_config_error());
    }

    #[test]
    fn test_is_archive_error() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(err.is_archive_error());
        assert!(!Error::internal("x").is_archive_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/prefs.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
