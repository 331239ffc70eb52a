use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error taxonomy shared by every service. Each operation is a single store
/// call, so no variant implies partial effects or compensating rollback.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing input. Never retried.
    #[error("{0}")]
    Validation(String),

    /// Caller's role does not match the operation, or the caller does not
    /// own the target entity.
    #[error("{0}")]
    Authorization(String),

    /// Referenced entity does not exist or is outside the caller's scope.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate creation or an invalid state transition.
    #[error("{0}")]
    Conflict(String),

    /// Underlying store failure, propagated as-is. Retries belong to the
    /// store client, not this layer.
    #[error("storage failure: {0}")]
    Persistence(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
