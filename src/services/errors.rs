//! Error type shared by every service function.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::editing::key::PathError;
use crate::editing::mutation::MutationError;
use crate::editing::store::SessionStoreError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The user lacks the role required for the operation.
    #[error("unauthorized")]
    Unauthorized,

    /// The addressed entity does not exist.
    #[error("not found")]
    NotFound,

    /// The submitted form is invalid; the message is shown to the user.
    #[error("{0}")]
    Form(String),

    /// The action path did not resolve to a field instance.
    #[error(transparent)]
    Path(#[from] PathError),

    /// The session store failed to read or write page state.
    #[error(transparent)]
    Session(#[from] SessionStoreError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<MutationError> for ServiceError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::RecordNotFound { .. } => ServiceError::NotFound,
            MutationError::Store(err) => ServiceError::Repository(err),
        }
    }
}
