use thiserror::Error;

use super::store::StoreError;

#[derive(Debug, Error)]
pub(crate) enum ServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Evaluation store failure");
        Self::Storage(err.0)
    }
}

pub(crate) type ServiceResult<T> = Result<T, ServiceError>;

pub(super) fn require_non_blank(value: &str, field: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidArgument(format!("{field} must not be blank")));
    }
    Ok(())
}
