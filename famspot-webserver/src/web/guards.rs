use rocket::{
    http::Status,
    outcome::try_outcome,
    request::{FromRequest, Outcome, Request},
    State,
};

use crate::{core::prelude::*, web::jwt};
use famspot_core::usecases::Error as ParameterError;

type Result<T> = std::result::Result<T, ParameterError>;

fn get_bearer_token(auth_header_val: &str) -> Option<&str> {
    let x: Vec<_> = auth_header_val.split(' ').collect();
    if x.len() == 2 && x[0] == "Bearer" {
        Some(x[1])
    } else {
        None
    }
}

/// The optional identity of the requesting user.
#[derive(Debug)]
pub struct Auth {
    user_id: Option<Id>,
}

impl Auth {
    pub fn user_id(&self) -> Result<&Id> {
        self.user_id.as_ref().ok_or(ParameterError::Unauthorized)
    }

    fn bearer_tokens_from_header<'r>(request: &'r Request) -> Vec<&'r str> {
        request
            .headers()
            .get("Authorization")
            .filter_map(get_bearer_token)
            .collect()
    }

    async fn user_id_from_jwt_in_header(
        request: &Request<'_>,
        bearer_tokens: &[&str],
    ) -> Option<Id> {
        let jwt_state = request.guard::<&State<jwt::JwtState>>().await.succeeded()?;
        bearer_tokens
            .iter()
            .filter_map(|token| jwt_state.validate_token_and_get_user_id(token).ok())
            .map(Id::from)
            .next()
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Auth {
    type Error = ();
    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let bearer_tokens = Self::bearer_tokens_from_header(request);
        let user_id = if cfg!(feature = "jwt") {
            Self::user_id_from_jwt_in_header(request, &bearer_tokens).await
        } else {
            None
        };
        if user_id.is_none() && !bearer_tokens.is_empty() {
            debug!("Rejected invalid bearer token");
        }
        Outcome::Success(Self { user_id })
    }
}

/// An authenticated user.
#[derive(Debug)]
pub struct Account(Id);

impl Account {
    pub fn user_id(&self) -> &Id {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Account {
    type Error = ();
    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth = try_outcome!(Auth::from_request(request).await);
        match auth.user_id() {
            Ok(user_id) => Outcome::Success(Account(user_id.clone())),
            _ => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

pub struct Version(pub &'static str);
