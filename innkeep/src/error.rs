//! Error types for the innkeep library.
//!
//! This module provides the error hierarchy for all booking, availability,
//! and teardown operations, using `thiserror` for ergonomic error handling.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::booking::ConflictingBooking;

/// Result type alias for operations that may fail with an innkeep error.
///
/// # Examples
///
/// ```
/// use innkeep::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(101)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the innkeep library.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input. No state was changed.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested tenant, room, or booking was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The room is not available for the requested interval.
    #[error("booking conflict: {details}")]
    Conflict {
        /// Details about the conflict.
        details: String,
        /// The active bookings that block the request.
        conflicts: Vec<ConflictingBooking>,
    },

    /// An expected dynamic table or column was missing when a write was attempted.
    #[error("schema inconsistency in {table}: {details}")]
    SchemaInconsistency {
        /// The table that was missing or malformed.
        table: String,
        /// Details about the inconsistency.
        details: String,
    },

    /// The store rejected a statement or commit inside a write transaction.
    ///
    /// The enclosing transaction has been rolled back by the time this
    /// error is observed.
    #[error("transaction failed during {operation}: {source}")]
    TransactionFailure {
        /// The step that was executing.
        operation: String,
        /// The underlying database error.
        #[source]
        source: rusqlite::Error,
    },

    /// The principal is not permitted to perform the operation.
    #[error("unauthorized: {details}")]
    Unauthorized {
        /// Details about the refused operation.
        details: String,
    },

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// A database error occurred outside a write transaction.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A JSON payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

/// Stable, machine-readable classification of an [`Error`].
///
/// Used by the JSON boundary and by the CLI to pick exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed input.
    BadRequest,
    /// Tenant, room, or booking absent.
    NotFound,
    /// Room unavailable for the interval.
    Conflict,
    /// Dynamic table or column missing.
    SchemaInconsistency,
    /// Store rejected a write; rolled back.
    TransactionFailure,
    /// Principal not allowed.
    Unauthorized,
    /// Busy timeout expired.
    LockTimeout,
    /// Anything else.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::SchemaInconsistency => "schema_inconsistency",
            Self::TransactionFailure => "transaction_failure",
            Self::Unauthorized => "unauthorized",
            Self::LockTimeout => "lock_timeout",
            Self::Internal => "internal",
        };
        write!(f, "{s}")
    }
}

impl Error {
    /// Builds a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Builds a not-found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Returns the classification of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use innkeep::{Error, ErrorKind};
    ///
    /// let err = Error::not_found("hotel 7");
    /// assert_eq!(err.kind(), ErrorKind::NotFound);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::Serialization(_) => ErrorKind::BadRequest,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::SchemaInconsistency { .. } => ErrorKind::SchemaInconsistency,
            Self::TransactionFailure { .. } => ErrorKind::TransactionFailure,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::LockTimeout { .. } => ErrorKind::LockTimeout,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Io(_)
            | Self::UnsupportedSchemaVersion { .. } => ErrorKind::Internal,
        }
    }

    /// Check if error indicates a missing tenant, room, or booking.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error indicates the room was unavailable.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Returns true if the `SQLite` error is a busy or locked condition.
pub(crate) fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::DatabaseBusy
                || e.code == rusqlite::ErrorCode::DatabaseLocked
    )
}

/// Returns a mapper that tags a database error with the transaction step it
/// occurred in.
///
/// # Examples
///
/// ```ignore
/// tx.execute(sql, params).map_err(in_transaction("insert guest"))?;
/// ```
pub(crate) fn in_transaction(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Error {
    move |source| Error::TransactionFailure {
        operation: operation.to_string(),
        source,
    }
}

impl From<crate::booking::ValidationError> for Error {
    fn from(err: crate::booking::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}
