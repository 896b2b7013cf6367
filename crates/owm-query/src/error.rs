//! Query building and catalog error types.

use thiserror::Error;

/// Errors returned by the query builder.
///
/// Every variant describes caller misuse that can be corrected and retried;
/// none of them indicate a bug in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("No valid query family: {0}")]
    InvalidFamily(String),

    #[error("No query named '{name}' in family {family}")]
    InvalidQueryName { family: String, name: String },

    #[error("Query requires {required} parameters, {provided} provided")]
    InsufficientParameters { required: usize, provided: usize },

    #[error("Query accepts at most {max} parameters, {provided} provided")]
    TooManyParameters { max: usize, provided: usize },
}

impl BuildError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFamily(family) => format!("Unknown query family '{}'.", family),
            Self::InvalidQueryName { family, name } => {
                format!("Query '{}' is not available for {}.", name, family)
            }
            Self::InsufficientParameters { required, provided } => format!(
                "Number of parameters: {}, required by the query: {}. Update the parameter list.",
                provided, required
            ),
            Self::TooManyParameters { max, provided } => format!(
                "Number of parameters: {}, accepted by the query: {}. Remove the extra values.",
                provided, max
            ),
        }
    }

    /// Whether the caller can fix the request and retry. Always true: the
    /// family, the name and the values all come from the caller.
    pub fn is_usage_error(&self) -> bool {
        match self {
            Self::InvalidFamily(_)
            | Self::InvalidQueryName { .. }
            | Self::InsufficientParameters { .. }
            | Self::TooManyParameters { .. } => true,
        }
    }
}

/// Errors raised while constructing a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unterminated placeholder in '{0}'")]
    UnterminatedPlaceholder(String),

    #[error("Invalid placeholder '{placeholder}' in '{pattern}'")]
    InvalidPlaceholder { pattern: String, placeholder: String },

    #[error("Placeholder PARAM{index} appears more than once in '{pattern}'")]
    DuplicatePlaceholder { pattern: String, index: usize },

    #[error("Placeholders in '{pattern}' are not numbered 1..{expected}")]
    NonContiguousPlaceholders { pattern: String, expected: usize },

    #[error("Suffix '{suffix}' must contain exactly PARAM{expected}")]
    InvalidSuffix { suffix: String, expected: usize },

    #[error("Query '{name}' defined twice in family {family}")]
    DuplicateName { family: String, name: String },

    #[error("Catalog parse error: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for CatalogError {
    fn from(e: toml::de::Error) -> Self {
        CatalogError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_parameters_message_reports_counts() {
        let err = BuildError::InsufficientParameters {
            required: 2,
            provided: 1,
        };
        let msg = err.user_message();
        assert!(msg.contains("parameters: 1"));
        assert!(msg.contains("query: 2"));
        assert_eq!(err.to_string(), "Query requires 2 parameters, 1 provided");
    }

    #[test]
    fn test_is_usage_error() {
        assert!(BuildError::InsufficientParameters {
            required: 1,
            provided: 0
        }
        .is_usage_error());
        assert!(BuildError::TooManyParameters { max: 2, provided: 3 }.is_usage_error());
        assert!(BuildError::InvalidFamily("7".into()).is_usage_error());
        assert!(BuildError::InvalidQueryName {
            family: "FiveDayForecast".into(),
            name: "by_circle".into()
        }
        .is_usage_error());
    }
}
