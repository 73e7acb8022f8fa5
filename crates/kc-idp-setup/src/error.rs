//! Setup error types.

use thiserror::Error;

/// Identity provider setup error type.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication against the admin API failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Admin API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Resource not found.
    #[error("{resource_type} not found: {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// Resource already exists.
    #[error("{resource_type} already exists: {id}")]
    AlreadyExists {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Setup result type.
pub type SetupResult<T> = Result<T, SetupError>;

impl SetupError {
    /// Creates a not-found error for an identity provider alias.
    pub fn identity_provider_not_found(alias: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: "identity provider".to_string(),
            id: alias.into(),
        }
    }

    /// Creates an already-exists error for an identity provider alias.
    pub fn identity_provider_exists(alias: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource_type: "identity provider".to_string(),
            id: alias.into(),
        }
    }
}
