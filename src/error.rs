use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Failures of the record and file repositories.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("not found")]
    NotFound,
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the identity provider, surfaced to callers unchanged.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid-email")]
    InvalidEmail,
    #[error("weak-password")]
    WeakPassword,
    #[error("email-already-in-use")]
    EmailTaken,
    #[error("invalid-credential")]
    InvalidCredentials,
    #[error("invalid-token: {0}")]
    InvalidToken(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error returned by HTTP handlers. Serialised as `{"error": "..."}`.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Unauthenticated(String),
    #[display(fmt = "{}", _0)]
    BadRequest(String),
    #[display(fmt = "{}", _0)]
    NotFound(String),
    #[display(fmt = "{}", _0)]
    Conflict(String),
    /// A backend call failed; the message names the attempted action.
    #[display(fmt = "{}", _0)]
    Failed(&'static str),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl ApiError {
    /// Map a repository failure for `action`, logging backend errors once here.
    pub fn from_repo(action: &'static str, err: RepoError) -> Self {
        match err {
            RepoError::Unauthenticated => ApiError::Unauthenticated("unauthenticated".into()),
            RepoError::NotFound => ApiError::NotFound("Not found".into()),
            RepoError::Invalid(msg) => ApiError::BadRequest(msg),
            RepoError::Store(e) => {
                tracing::error!(error = %e, action, "Backend call failed");
                ApiError::Failed(action)
            }
        }
    }

    pub fn from_auth(action: &'static str, err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail | AuthError::WeakPassword => {
                ApiError::BadRequest(err.to_string())
            }
            AuthError::EmailTaken => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidToken(_) => {
                ApiError::Unauthenticated(err.to_string())
            }
            AuthError::Hash(_) | AuthError::Signing(_) | AuthError::Store(_) => {
                tracing::error!(error = %err, action, "Identity provider call failed");
                ApiError::Failed(action)
            }
        }
    }
}
