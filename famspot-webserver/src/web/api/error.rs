use std::fmt::Display;

use anyhow::anyhow;
use famspot_application::error::AppError;
pub use famspot_core::{repositories::Error as RepoError, usecases::Error as ParameterError};
use rocket::{
    self,
    response::{self, Responder},
    serde::json::Error as JsonError,
    Request,
};
use serde_json::Value;
use thiserror::Error;

use super::json_error_response;
use crate::adapters::json::ErrorCode;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("Malformed request body: {0}")]
    BadRequest(#[source] anyhow::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<JsonError<'_>> for Error {
    fn from(err: JsonError) -> Self {
        match err {
            JsonError::Io(err) => Self::BadRequest(anyhow!(err)),
            JsonError::Parse(_str, err) => Self::BadRequest(anyhow!(err)),
        }
    }
}

impl From<RepoError> for Error {
    fn from(err: RepoError) -> Self {
        AppError::from(err).into()
    }
}

impl From<ParameterError> for Error {
    fn from(err: ParameterError) -> Self {
        Self::App(err.into())
    }
}

type Classified = (ErrorCode, String, Value);

fn internal(err: impl Display) -> Classified {
    error!("Internal server error: {err}");
    (
        ErrorCode::ServerError,
        "An unexpected error occurred".to_owned(),
        Value::Null,
    )
}

fn classify_usecase_error(err: ParameterError) -> Classified {
    match err {
        ParameterError::Validation(err) => {
            let details = serde_json::to_value(err.fields()).unwrap_or_default();
            (ErrorCode::ValidationError, err.message().to_owned(), details)
        }
        err @ ParameterError::Unauthorized => (ErrorCode::Unauthorized, err.to_string(), Value::Null),
        err @ ParameterError::Forbidden => (ErrorCode::Forbidden, err.to_string(), Value::Null),
        err @ ParameterError::Conflict => (ErrorCode::Conflict, err.to_string(), Value::Null),
        ParameterError::Repo(err @ RepoError::NotFound) => {
            (ErrorCode::NotFound, err.to_string(), Value::Null)
        }
        ParameterError::Repo(err @ RepoError::AlreadyExists) => {
            (ErrorCode::Conflict, err.to_string(), Value::Null)
        }
        ParameterError::Repo(err @ RepoError::Other(_)) => internal(err),
    }
}

impl Error {
    /// Maps the error onto what is exposed to clients.
    ///
    /// Details of unclassified errors are only logged.
    fn classify(self) -> Classified {
        match self {
            Self::App(AppError::Business(err)) => classify_usecase_error(err),
            Self::App(err) => internal(err),
            Self::BadRequest(err) => (ErrorCode::BadRequest, err.to_string(), Value::Null),
            Self::Other(err) => internal(err),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let (code, message, details) = self.classify();
        if code != ErrorCode::ServerError {
            debug!("Rejected request {} {}: {message}", req.method(), req.uri());
        }
        json_error_response(req, code, message, details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use famspot_core::util::validate::ValidationError;
    use serde_json::json;

    #[test]
    fn classify_validation_errors_with_details() {
        let err = ValidationError::new("Invalid review")
            .with("axes", "duplicate axis noise")
            .with("overall", "must be between 1 and 5");
        let (code, message, details) = Error::from(ParameterError::from(err)).classify();
        assert_eq!(ErrorCode::ValidationError, code);
        assert_eq!("Invalid review", message);
        assert_eq!(
            json!({
                "axes": ["duplicate axis noise"],
                "overall": ["must be between 1 and 5"],
            }),
            details
        );
    }

    #[test]
    fn hide_details_of_internal_errors() {
        let (code, message, details) =
            Error::from(RepoError::Other(anyhow!("disk I/O error"))).classify();
        assert_eq!(ErrorCode::ServerError, code);
        assert!(!message.contains("disk"));
        assert_eq!(Value::Null, details);
    }

    #[test]
    fn classify_not_found() {
        let (code, _, _) = Error::from(RepoError::NotFound).classify();
        assert_eq!(ErrorCode::NotFound, code);
    }
}
