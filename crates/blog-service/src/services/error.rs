//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use blog_common::AppError;
use blog_core::{CommentType, DomainError};
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or store failure
    Domain(DomainError),

    /// Application error (auth, config)
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// No authenticated user where one is required
    Unauthenticated,

    /// Authenticated but not allowed
    PermissionDenied(String),

    /// Validation error
    Validation(String),

    /// Comment type has no author to notify
    UnsupportedCommentType(CommentType),

    /// No recipient could be resolved, or the recipient has no usable email address
    NoRecipientEmail { user_id: Option<i64> },

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Unauthenticated => write!(f, "Authentication required"),
            Self::PermissionDenied(action) => write!(f, "Not allowed to {action}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::UnsupportedCommentType(t) => {
                write!(f, "No notification recipient for {t} comments")
            }
            Self::NoRecipientEmail {
                user_id: Some(user_id),
            } => write!(f, "No email address for user {user_id}"),
            Self::NoRecipientEmail { user_id: None } => write!(f, "No notification recipient"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn permission_denied(action: impl Into<String>) -> Self {
        Self::PermissionDenied(action.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether a backing store failed (the request may succeed on retry)
    pub fn is_store_unavailable(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_store_unavailable(),
            Self::App(e) => e.status_code() == 503,
            _ => false,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => AppError::status_code_for_domain(e),
            Self::App(e) => e.status_code(),
            Self::NotFound { .. } | Self::NoRecipientEmail { .. } => 404,
            Self::Unauthenticated => 401,
            Self::PermissionDenied(_) => 403,
            Self::Validation(_) | Self::UnsupportedCommentType(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthenticated => "MISSING_AUTH",
            Self::PermissionDenied(_) => "INSUFFICIENT_PERMISSIONS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnsupportedCommentType(_) => "UNSUPPORTED_COMMENT_TYPE",
            Self::NoRecipientEmail { .. } => "NO_RECIPIENT_EMAIL",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::Unauthenticated => AppError::MissingAuth,
            ServiceError::PermissionDenied(_) => AppError::InsufficientPermissions,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            e @ ServiceError::UnsupportedCommentType(_) => AppError::Validation(e.to_string()),
            e @ ServiceError::NoRecipientEmail { .. } => AppError::NotFound(e.to_string()),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
