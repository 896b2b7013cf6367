//! Client-specific error types.

use owm_core::{AppError, NetworkError};
use owm_query::BuildError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The query could not be built; nothing was sent.
    #[error(transparent)]
    Query(#[from] BuildError),

    /// The request was sent and failed, or the API answered with an error.
    #[error(transparent)]
    Transport(#[from] NetworkError),
}

impl ClientError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Query(e) => e.user_message(),
            Self::Transport(e) => e.user_message().to_string(),
        }
    }

    /// Upstream HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status(),
            Self::Query(_) => None,
        }
    }

    /// Whether the caller can correct its input and try again.
    pub fn is_usage_error(&self) -> bool {
        match self {
            Self::Query(e) => e.is_usage_error(),
            Self::Transport(_) => false,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Query(e) => AppError::Query(e),
            ClientError::Transport(e) => AppError::Network(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_transport() {
        let err = ClientError::Transport(NetworkError::ServerError {
            status: 404,
            message: "city not found".into(),
        });
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_usage_error());
        assert_eq!(err.to_string(), "Server error: 404 - city not found");

        let err = ClientError::Query(BuildError::InvalidFamily("x".into()));
        assert_eq!(err.status(), None);
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = ClientError::Transport(NetworkError::Timeout).into();
        assert!(matches!(app, AppError::Network(NetworkError::Timeout)));

        let app: AppError = ClientError::Query(BuildError::InsufficientParameters {
            required: 1,
            provided: 0,
        })
        .into();
        assert!(app.is_usage_error());
    }

    #[test]
    fn test_usage_error_agrees_with_build_error() {
        let build = BuildError::InvalidQueryName {
            family: "UVIndex".into(),
            name: "by_city_ID".into(),
        };
        assert!(build.is_usage_error());

        let client = ClientError::Query(build.clone());
        assert!(client.is_usage_error());

        let app: AppError = client.into();
        assert!(app.is_usage_error());
        assert!(AppError::Query(build).is_usage_error());
    }
}
