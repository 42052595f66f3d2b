//! Error types for the tracker library.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for every tracker and store operation.
///
/// Variants fall into the four groups the tracker surfaces to users:
/// validation failures (raised before any storage call), storage failures
/// (create/update rejected), upload failures (per attachment) and fetch
/// failures (catalogs or the step list).
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Case not found for the given ID
    #[error("Case with ID {id} not found")]
    CaseNotFound { id: u64 },
    /// Workstation step not found for the given ID
    #[error("Workstation step with ID {id} not found")]
    StepNotFound { id: u64 },
    /// The step was generated by the system and cannot be edited
    #[error("Workstation step {id} was generated by the system and cannot be edited")]
    StepNotEditable { id: u64 },
    /// An operation needed a draft that has not been started
    #[error("No {kind} is in progress")]
    NoActiveDraft { kind: &'static str },
    /// A required field is missing or invalid
    #[error("Invalid input for field '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// The data store rejected a create or update
    #[error("Storage error: {message}")]
    Storage { message: String },
    /// An attachment could not be written to object storage
    #[error("Upload of '{file_name}' failed: {reason}")]
    Upload { file_name: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> TrackerError {
        TrackerError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating validation errors.
pub struct ValidationErrorBuilder {
    field: String,
}

impl ValidationErrorBuilder {
    /// Create a new validation error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> TrackerError {
        TrackerError::Validation {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl TrackerError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for validation errors.
    pub fn validation(field: impl Into<String>) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(field)
    }

    /// Wraps any store-side failure of a create or update call.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether the error was raised before any storage call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| TrackerError::database(message).with_source(e))
    }
}

/// Extension trait for mapping blocking task join failures.
pub trait JoinResultExt<T> {
    /// Convert a `spawn_blocking` join error into a configuration error.
    fn join_context(self) -> Result<T>;
}

impl<T> JoinResultExt<T> for std::result::Result<T, tokio::task::JoinError> {
    fn join_context(self) -> Result<T> {
        self.map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_builder_sets_field_and_reason() {
        let err = TrackerError::validation("status").with_reason("Status is required");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'status': Status is required"
        );
    }

    #[test]
    fn storage_errors_are_not_validation_errors() {
        let err = TrackerError::storage("constraint failed");
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Storage error: constraint failed");
    }

    #[test]
    fn db_context_wraps_rusqlite_errors() {
        let result: std::result::Result<(), rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        match result.db_context("Failed to load step") {
            Err(TrackerError::Database { message, .. }) => {
                assert_eq!(message, "Failed to load step");
            }
            other => panic!("Expected database error, got {other:?}"),
        }
    }
}
