//! Error types for routing.

use thiserror::Error;

use crate::method::Method;

/// Router-specific errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The requested HTTP method is not one the router tracks.
    #[error("unsupported HTTP method `{0}`")]
    InvalidMethod(String),

    /// A raw route map is missing a required key.
    #[error("{0}")]
    MapDefinition(String),

    /// No route under any method matched the path.
    #[error("Unable to handle request for route `{route}`.")]
    RouteNotFound {
        /// The normalized path that was looked up.
        route: String,
    },

    /// The path matched, but only under other methods.
    #[error("Route `{route}` does not support `{method}` requests.")]
    MethodNotAllowed {
        /// Methods under which the path does match, sorted and deduplicated.
        allowed: Vec<Method>,
        /// The normalized path that was looked up.
        route: String,
        /// The rejected method.
        method: Method,
    },

    /// A pattern segment could not be compiled.
    #[error("invalid segment `{segment}` in pattern `{pattern}`: {reason}")]
    InvalidPatternSegment {
        /// The pattern being compiled.
        pattern: String,
        /// The offending segment.
        segment: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A custom variable rule is not a valid regular expression.
    #[error("invalid rule for variable `{variable}` in pattern `{pattern}`: {source}")]
    InvalidRule {
        /// The variable the rule was declared for.
        variable: String,
        /// The pattern being compiled.
        pattern: String,
        /// The regex compilation error.
        source: regex::Error,
    },

    /// The REST decorator has no controller suffix for this method.
    #[error("Unable to support the HTTP method `{0}`.")]
    UnsupportedMethod(Method),

    /// IO error while reading or writing route files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RouterError {
    /// HTTP status code conventionally associated with this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::RouteNotFound { .. } | Self::UnsupportedMethod(_) => 404,
            Self::MethodNotAllowed { .. } => 405,
            _ => 500,
        }
    }

    /// The allowed methods carried by a `MethodNotAllowed` error.
    #[must_use]
    pub fn allowed_methods(&self) -> Option<&[Method]> {
        match self {
            Self::MethodNotAllowed { allowed, .. } => Some(allowed),
            _ => None,
        }
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = RouterError::RouteNotFound {
            route: "missing".to_string(),
        };
        assert_eq!(not_found.status_code(), 404);

        let not_allowed = RouterError::MethodNotAllowed {
            allowed: vec![Method::Get],
            route: "login".to_string(),
            method: Method::Post,
        };
        assert_eq!(not_allowed.status_code(), 405);
        assert_eq!(not_allowed.allowed_methods(), Some(&[Method::Get][..]));

        assert_eq!(RouterError::InvalidMethod("FOO".into()).status_code(), 500);
    }

    #[test]
    fn test_messages() {
        let err = RouterError::MethodNotAllowed {
            allowed: vec![Method::Get],
            route: "test/foo".to_string(),
            method: Method::Post,
        };
        assert_eq!(
            err.to_string(),
            "Route `test/foo` does not support `POST` requests."
        );

        let err = RouterError::RouteNotFound {
            route: "anything".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to handle request for route `anything`."
        );
    }
}
