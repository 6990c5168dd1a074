//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::EntityId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Authentication
    // =========================================================================
    #[error("Not logged in")]
    Unauthenticated,

    // =========================================================================
    // Not Found
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(EntityId),

    #[error("Comment not found: {0}")]
    CommentNotFound(EntityId),

    // =========================================================================
    // Validation
    // =========================================================================
    #[error("Report reason must not be empty")]
    EmptyReportReason,

    // =========================================================================
    // Server Rejection
    // =========================================================================
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Insufficient permissions: {0}")]
    PermissionDenied(String),

    // =========================================================================
    // Transport
    // =========================================================================
    #[error("Gateway error: {0}")]
    Gateway(String),
}

impl DomainError {
    /// Check if this is an authentication failure
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Check if this is a not-found error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PostNotFound(_) | Self::CommentNotFound(_))
    }

    /// Check if the server refused the request (validation or permission)
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::PermissionDenied(_))
    }

    /// Check if the request never reached a decision (network/transport)
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }
}
