//! Error types for bikefleet.
//!
//! This module defines all error types used throughout the bikefleet crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for bikefleet operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Fleet Errors ===
    /// No bike with the given ID exists.
    #[error("bike not found: {id}")]
    BikeNotFound {
        /// The ID that was looked up.
        id: String,
    },

    /// No maintenance record with the given ID exists.
    #[error("maintenance record not found: {id}")]
    MaintenanceNotFound {
        /// The ID that was looked up.
        id: String,
    },

    /// No booking with the given ID exists.
    #[error("booking not found: {id}")]
    BookingNotFound {
        /// The ID that was looked up.
        id: String,
    },

    /// The requested dates collide with an existing booking of the same bike.
    #[error("bike {bike_id} is already booked in that period ({booking_number})")]
    BookingConflict {
        /// The bike being booked.
        bike_id: String,
        /// Number of the booking that is in the way.
        booking_number: String,
    },

    /// A maintenance record was concluded twice.
    #[error("maintenance record {id} is already resolved")]
    AlreadyResolved {
        /// The record ID.
        id: String,
    },

    /// Input failed validation.
    #[error("invalid input: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

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

/// A specialized Result type for bikefleet operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a bike-not-found error.
    #[must_use]
    pub fn bike_not_found(id: impl Into<String>) -> Self {
        Self::BikeNotFound { id: id.into() }
    }

    /// Create a maintenance-not-found error.
    #[must_use]
    pub fn maintenance_not_found(id: impl Into<String>) -> Self {
        Self::MaintenanceNotFound { id: id.into() }
    }

    /// Create a booking-not-found error.
    #[must_use]
    pub fn booking_not_found(id: impl Into<String>) -> Self {
        Self::BookingNotFound { id: id.into() }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means a looked-up record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BikeNotFound { .. } | Self::MaintenanceNotFound { .. } | Self::BookingNotFound { .. }
        )
    }

    /// Check if this error is a booking collision.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::BookingConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::bike_not_found("bike-1");
        assert_eq!(err.to_string(), "bike not found: bike-1");

        let err = Error::validation("ref_no is empty");
        assert_eq!(err.to_string(), "invalid input: ref_no is empty");
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::bike_not_found("x").is_not_found());
        assert!(Error::maintenance_not_found("x").is_not_found());
        assert!(Error::booking_not_found("x").is_not_found());
        assert!(!Error::validation("x").is_not_found());
    }

    #[test]
    fn test_booking_conflict_display() {
        let err = Error::BookingConflict {
            bike_id: "bike-2".to_string(),
            booking_number: "R-001".to_string(),
        };
        assert!(err.is_conflict());
        let msg = err.to_string();
        assert!(msg.contains("bike-2"));
        assert!(msg.contains("R-001"));
    }

    #[test]
    fn test_already_resolved_display() {
        let err = Error::AlreadyResolved {
            id: "maint-9".to_string(),
        };
        assert_eq!(err.to_string(), "maintenance record maint-9 is already resolved");
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
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
            "/nonexistent/path/db.sqlite",
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
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "overdue_days_threshold must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("overdue_days_threshold"));
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
