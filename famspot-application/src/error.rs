use famspot_core::{repositories::Error as RepoError, usecases::Error as UsecaseError};
use thiserror::Error;

pub use famspot_core::repositories;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Business(#[from] UsecaseError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error(transparent)]
    R2d2(#[from] r2d2::Error),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> AppError {
        AppError::Business(err.into())
    }
}

impl AppError {
    /// The classified use case error, if any.
    pub fn as_usecase_error(&self) -> Option<&UsecaseError> {
        match self {
            Self::Business(err) => Some(err),
            _ => None,
        }
    }
}
