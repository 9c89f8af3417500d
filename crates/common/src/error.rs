//! Error types for moddesk.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Data Access Errors ===
    /// A read-path database call failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// A write-path database call failed.
    #[error("Update failed: {0}")]
    Update(String),

    /// An update matched no row.
    #[error("Not found: {0}")]
    NotFound(String),

    // === Bootstrap Errors ===
    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection or subscriber setup failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Query(_) => "QUERY_FAILURE",
            Self::Update(_) => "UPDATE_FAILURE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether the caller should treat this as a server-side failure.
    ///
    /// Everything except [`AppError::NotFound`] maps to a 5xx at the HTTP boundary.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}

// === From implementations ===

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
