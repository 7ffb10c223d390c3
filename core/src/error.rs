//! Error types for the upstream cars API client.
//!
//! # Design
//! `Rejected` keeps the upstream status next to the decoded message: the
//! proxy propagates the upstream status code unchanged, so callers need both.

use thiserror::Error;

/// Errors returned by `CarApiClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The upstream answered with a status other than the one the operation
    /// expects. `message` comes from the `error_message` field of the body.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Upstream status for `Rejected`, `None` for local failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Serialization(_) => None,
        }
    }
}
