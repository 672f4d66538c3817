//! Unified error type for the payables tracker.
//!
//! Only aggregate-level failures live here. Problems with a single payable or payment
//! record never surface as an `Error`; they are collected as [`crate::core::issues::Issue`]
//! values next to the report they affected.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned by the service layer, the data sources and the configuration loader.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Database query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure (snapshot or config file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot document that is not a valid ledger feed
    #[error("Snapshot error: {message}")]
    Snapshot {
        /// Human-readable description of the problem
        message: String,
    },

    /// JSON encoding failure while rendering a report
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Date range whose start lies after its end
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange {
        /// Requested start date
        start: NaiveDate,
        /// Requested end date
        end: NaiveDate,
    },

    /// Unknown time-bucketing granularity
    #[error("Invalid granularity '{value}': expected day, month or year")]
    InvalidGranularity {
        /// The rejected input
        value: String,
    },

    /// A single payable could not be reconciled
    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] crate::core::reconcile::ReconcileError),

    /// No payable with the given id exists in the source
    #[error("Payable not found: {id}")]
    PayableNotFound {
        /// The id that was looked up
        id: i64,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
