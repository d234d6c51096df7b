use thiserror::Error;

use crate::infra::store::StoreError;

#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    BadParamInput(String),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type EngagementResult<T> = Result<T, EngagementError>;

impl EngagementError {
    pub fn bad_param(message: impl Into<String>) -> Self {
        Self::BadParamInput(message.into())
    }

    /// Store failures with no operation-specific meaning.
    pub(crate) fn internal(err: StoreError) -> Self {
        match err {
            StoreError::Backend(err) => Self::Internal(err),
            other => Self::Internal(anyhow::Error::new(other)),
        }
    }
}
