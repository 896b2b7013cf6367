//! Centralized error types for the OWM client.
//!
//! This module provides a typed error hierarchy that:
//! - Lets callers branch on every failure kind
//! - Provides user-friendly messages suitable for terminal output
//! - Preserves full error context for logging

use owm_query::{BuildError, CatalogError};
use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a message suitable for display.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("City data error: {0}")]
    CityData(#[from] CityDataError),

    #[error("Query error: {0}")]
    Query(#[from] BuildError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(e) => e.user_message().to_string(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::CityData(e) => e.user_message().to_string(),
            AppError::Query(e) => e.user_message(),
            AppError::Catalog(_) => "The query catalog is invalid. Check the catalog file.".to_string(),
            AppError::Io(_) => "A file operation failed. Please try again.".to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }

    /// Whether the same operation could succeed with corrected input.
    pub fn is_usage_error(&self) -> bool {
        match self {
            AppError::Query(e) => e.is_usage_error(),
            _ => false,
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    /// Non-200 answer from the API, with the upstream status and message.
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status: 401, .. } => {
                "The API key was rejected. Check your settings."
            }
            NetworkError::ServerError { status: 404, .. } => "No data found for that query.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }

    /// Upstream HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors acquiring or reading the bulk city list.
#[derive(Debug, Error)]
pub enum CityDataError {
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Decompression failed: {0}")]
    Decompress(String),

    #[error("City data I/O failed: {0}")]
    Io(String),

    #[error("City data is malformed: {0}")]
    Parse(String),
}

impl CityDataError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CityDataError::Download(_) => {
                "Unable to download the city list. Check your internet connection."
            }
            CityDataError::Decompress(_) => "The downloaded city list is corrupted.",
            CityDataError::Io(_) => "Unable to read or write the local city list.",
            CityDataError::Parse(_) => {
                "The local city list is malformed. Delete it to download it again."
            }
        }
    }
}

impl From<serde_json::Error> for CityDataError {
    fn from(e: serde_json::Error) -> Self {
        CityDataError::Parse(e.to_string())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Network(NetworkError::Timeout),
            AppError::Config(ConfigError::Invalid("test".into())),
            AppError::CityData(CityDataError::Download("test".into())),
            AppError::Query(BuildError::InvalidFamily("9".into())),
            AppError::Catalog(CatalogError::Parse("test".into())),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "{:?}", err);
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let build_err = BuildError::InsufficientParameters {
            required: 2,
            provided: 1,
        };
        let app_err: AppError = build_err.into();
        assert!(matches!(
            app_err,
            AppError::Query(BuildError::InsufficientParameters { .. })
        ));
        assert!(app_err.is_usage_error());
    }

    #[test]
    fn test_server_error_messages() {
        let err = NetworkError::ServerError {
            status: 401,
            message: "Invalid API key".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.user_message().contains("API key"));
        assert_eq!(err.to_string(), "Server error: 401 - Invalid API key");

        let err = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        assert!(err.user_message().contains("later"));
        assert_eq!(NetworkError::Timeout.status(), None);
    }

    #[test]
    fn test_json_error_becomes_parse_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CityDataError = json_err.into();
        assert!(matches!(err, CityDataError::Parse(_)));
    }
}
