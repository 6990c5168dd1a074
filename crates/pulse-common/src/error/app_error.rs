//! Application error types
//!
//! Unified error handling for the client. Every mutation error is caught at
//! the action boundary and classified here; nothing in this taxonomy is
//! allowed to escape into rendering code as a panic.

use pulse_core::DomainError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Not logged in")]
    Unauthenticated,

    // Mutation errors
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    // Realtime channel errors
    #[error("Channel error: {0}")]
    Channel(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Domain errors
    #[error(transparent)]
    Domain(DomainError),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get error code for notices and logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Rejected(_) => "REJECTED",
            Self::Channel(_) => "CHANNEL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(_) => "DOMAIN_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failed action rolled back and may simply be re-triggered
    /// by the user (mutations are never retried automatically)
    #[must_use]
    pub fn is_retriable_by_user(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Channel(_))
    }

    /// Whether the error means the user must authenticate first
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthenticated)
            || matches!(self, Self::Domain(e) if e.is_unauthenticated())
    }

    /// Short human-readable message suitable for a notice
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated => "Please log in to react".to_string(),
            Self::Transport(_) | Self::Channel(_) => {
                "Something went wrong, please try again".to_string()
            }
            Self::Rejected(msg) => msg.clone(),
            Self::Config(_) | Self::Internal(_) => "Something went wrong".to_string(),
            Self::Domain(e) => e.to_string(),
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

// Domain errors fold into the flat client taxonomy so callers match on one
// shape only
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Unauthenticated => Self::Unauthenticated,
            DomainError::Gateway(msg) => Self::Transport(msg),
            DomainError::Rejected(msg) | DomainError::PermissionDenied(msg) => Self::Rejected(msg),
            other => Self::Domain(other),
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
