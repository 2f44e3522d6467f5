//! Error types for the metadata API client

use std::time::Duration;

use thiserror::Error;

use crate::Resource;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when looking up records in the metadata API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, TLS, ...)
    #[error("request to {url} failed")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API has no record with this ID
    #[error("{resource} {id:?} not found")]
    NotFound { resource: Resource, id: String },

    /// The token was missing, invalid, or lacks access to the record
    #[error("not authorized to read {resource} {id:?} (status {status})")]
    Unauthorized {
        resource: Resource,
        id: String,
        status: u16,
    },

    /// Any other non-success status
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response body was not a valid record
    #[error("malformed {resource} record: {message}")]
    ParseError { resource: Resource, message: String },

    /// The request was rejected before being sent
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The call did not complete within its deadline
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Maps a non-success response onto the matching variant
    pub(crate) fn from_status(resource: Resource, id: &str, status: u16, body: String) -> Self {
        match status {
            404 => Self::NotFound {
                resource,
                id: id.to_string(),
            },
            401 | 403 => Self::Unauthorized {
                resource,
                id: id.to_string(),
                status,
            },
            _ => Self::api_error(status, body),
        }
    }

    /// Check if the record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the failure is due to credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Check if the call ran out of time
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::RequestFailed { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}
