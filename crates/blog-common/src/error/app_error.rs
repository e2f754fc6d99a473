//! Application error types
//!
//! Errors raised outside the domain model: token checks, startup wiring and
//! store connectivity. Every variant knows its HTTP status and wire code.

use blog_core::DomainError;
use std::fmt;

/// Message returned for any failure of a backing store
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

/// Message returned for every other server side failure
pub const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing authentication")]
    MissingAuth,

    /// Authenticated, but not the blog owner
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidToken | Self::TokenExpired | Self::MissingAuth => 401,
            Self::InsufficientPermissions => 403,
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Database(_) | Self::Cache(_) => 503,
            Self::Config(_) | Self::Internal(_) => 500,
            Self::Domain(e) => Self::status_code_for_domain(e),
        }
    }

    /// HTTP status for a domain error, shared with layers that wrap `DomainError` themselves
    #[must_use]
    pub fn status_code_for_domain(err: &DomainError) -> u16 {
        if err.is_not_found() {
            404
        } else if err.is_validation() {
            400
        } else if err.is_store_unavailable() {
            503
        } else {
            500
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::MissingAuth => "MISSING_AUTH",
            Self::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Text safe to show a client for an error with `status`
    ///
    /// Server side failures collapse to two fixed messages; store and host
    /// details only reach the logs.
    #[must_use]
    pub fn public_message(status: u16, detail: impl fmt::Display) -> String {
        match status {
            503 => UNAVAILABLE_MESSAGE.to_string(),
            500.. => INTERNAL_MESSAGE.to_string(),
            _ => detail.to_string(),
        }
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
