use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use car_core::FALLBACK_ERROR_MESSAGE;
use thiserror::Error;

use crate::repository::RepositoryError;

/// Everything a handler can answer with instead of a relayed success.
///
/// Bodies are plain text. `Internal` only logs its detail; the caller gets
/// the generic fallback message.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(&'static str),

    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for ProxyError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Rejected { status, message } => match StatusCode::from_u16(status) {
                Ok(status) => ProxyError::Upstream { status, message },
                Err(_) => ProxyError::Internal(format!("upstream sent invalid status {status}")),
            },
            other => ProxyError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ProxyError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                FALLBACK_ERROR_MESSAGE.to_string()
            }
            other => {
                if status.is_server_error() {
                    tracing::error!(status = status.as_u16(), error = %other, "upstream failure");
                } else {
                    tracing::warn!(status = status.as_u16(), error = %other, "request rejected");
                }
                other.to_string()
            }
        };
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;

    #[test]
    fn rejected_keeps_upstream_status() {
        let err = ProxyError::from(RepositoryError::Rejected {
            status: 404,
            message: "record x does not exist".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "record x does not exist");
    }

    #[test]
    fn transport_failure_becomes_internal() {
        let err = ProxyError::from(RepositoryError::Transport(TransportError(
            "connection refused".to_string(),
        )));
        assert!(matches!(err, ProxyError::Internal(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn method_not_allowed_is_405() {
        let resp = ProxyError::MethodNotAllowed("nope").into_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
