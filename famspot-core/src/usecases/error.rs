use crate::{repositories, util::validate::ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("This is not allowed without auth")]
    Unauthorized,
    #[error("This is not allowed")]
    Forbidden,
    #[error("The request conflicts with the current state")]
    Conflict,
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repo(repositories::Error::NotFound))
    }
}
