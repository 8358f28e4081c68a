pub mod repository;
pub mod dependency;

pub use dependency::DependencyGuard;

/// Failures surfaced by the coupon exchange services.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Missing or malformed input. Raised before any write.
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFoundError(String),
    /// A conditional update matched no row.
    #[error("Conflict: {0}")]
    ConflictError(String),
    /// Persistence unreachable, timed out, or failed unexpectedly.
    #[error("Dependency unavailable: {0}")]
    DependencyError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFoundError(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::ConflictError(msg.into())
    }

    pub fn dependency(msg: impl Into<String>) -> Self {
        Self::DependencyError(msg.into())
    }
}
