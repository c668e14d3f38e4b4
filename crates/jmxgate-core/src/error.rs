use thiserror::Error;

/// Core error types for bridge request facts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid object name '{name}': {reason}")]
    InvalidObjectName { name: String, reason: String },

    #[error("Unknown request type: {0}")]
    UnknownRequestType(String),

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedHttpMethod(String),
}

impl CoreError {
    /// Create a new InvalidObjectName error
    pub fn invalid_object_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidObjectName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new UnknownRequestType error
    pub fn unknown_request_type(name: impl Into<String>) -> Self {
        Self::UnknownRequestType(name.into())
    }

    /// Create a new UnsupportedHttpMethod error
    pub fn unsupported_http_method(method: impl Into<String>) -> Self {
        Self::UnsupportedHttpMethod(method.into())
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
