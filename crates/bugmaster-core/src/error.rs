// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the BugMaster bot.

use thiserror::Error;

/// The primary error type used across all BugMaster collaborators and handlers.
#[derive(Debug, Error)]
pub enum BugMasterError {
    /// Configuration errors (invalid TOML, missing required fields, bad channel rule files).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat platform errors (API failure, rejected call, malformed response).
    #[error("chat error: {message}")]
    Chat {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// CI report errors that are not an expected "skip this link" condition.
    #[error("report error: {message}")]
    Report {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No handler is registered for the `(type, subtype)` pair.
    #[error("event not supported: type `{event_type}`, subtype `{subtype}`")]
    NotSupportedEvent { event_type: String, subtype: String },

    /// No handler is registered for the command keyword.
    #[error("command not supported: `{command}`")]
    NotSupportedCommand { command: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Outcome of a failed report load or evaluation.
///
/// `Skip` is the expected "report truncated or unparsable" condition and is
/// handled per link. `Fault` is anything else and aborts the event.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The report cannot be used, but this is an anticipated condition.
    #[error("report skipped: {reason}")]
    Skip { reason: String },

    /// An unexpected failure while fetching or evaluating the report.
    #[error(transparent)]
    Fault(#[from] BugMasterError),
}

impl LoadError {
    /// Convenience constructor for [`LoadError::Skip`].
    pub fn skip(reason: impl Into<String>) -> Self {
        LoadError::Skip {
            reason: reason.into(),
        }
    }
}
