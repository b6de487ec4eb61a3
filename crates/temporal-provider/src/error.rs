// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for temporal-provider.

use temporal_protocol::{Code, Status};
use thiserror::Error;

use crate::diagnostics::Diagnostics;

/// Result type using ProviderError.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur when managing Temporal resources.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Local validation failed before any remote call was made.
    #[error("invalid {attribute}: {message}")]
    Validation { attribute: String, message: String },

    /// The object being created is already registered.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The object does not exist on the server.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server rejected the call.
    #[error("{operation} failed: {}", .status.message())]
    Remote {
        operation: String,
        #[source]
        status: Status,
    },

    /// The server could not be reached.
    #[error("transport error during {operation}: {message}")]
    Transport { operation: String, message: String },

    /// The caller cancelled the operation.
    #[error("operation cancelled: {0}")]
    Cancelled(String),

    /// The caller's deadline elapsed.
    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Import identifier does not match `namespace:id` or `id`.
    #[error("invalid import id {id:?}: expected {expected}")]
    InvalidImportId { id: String, expected: String },

    /// One or more error-level diagnostics were collected.
    #[error("{0}")]
    Diagnostics(Diagnostics),
}

impl ProviderError {
    /// Validation error tied to a configuration attribute.
    pub fn validation(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Validation {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Classify a gRPC status returned by `operation`.
    ///
    /// `AlreadyExists` and `NotFound` get their own kinds so callers can react
    /// to them; connectivity failures become `Transport`; everything else is
    /// `Remote` with the original status attached.
    pub fn from_status(operation: impl Into<String>, status: Status) -> Self {
        let operation = operation.into();
        match status.code() {
            Code::AlreadyExists => {
                ProviderError::AlreadyExists(format!("{}: {}", operation, status.message()))
            }
            Code::NotFound => ProviderError::NotFound(format!("{}: {}", operation, status.message())),
            Code::Unavailable => ProviderError::Transport {
                operation,
                message: status.message().to_string(),
            },
            Code::DeadlineExceeded => {
                ProviderError::DeadlineExceeded(format!("{}: {}", operation, status.message()))
            }
            Code::Cancelled => {
                ProviderError::Cancelled(format!("{}: {}", operation, status.message()))
            }
            _ => ProviderError::Remote { operation, status },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, ProviderError::AlreadyExists(_))
    }
}

impl From<temporal_protocol::ClientError> for ProviderError {
    fn from(err: temporal_protocol::ClientError) -> Self {
        ProviderError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Serialization(err.to_string())
    }
}

impl From<Diagnostics> for ProviderError {
    fn from(diags: Diagnostics) -> Self {
        ProviderError::Diagnostics(diags)
    }
}
