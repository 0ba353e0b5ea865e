use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::{auth::LoginError, emails::EmailError, users::UserError, weather::WeatherError};

/// Error returned by request handlers.
///
/// Maps service failures to status codes without leaking internal detail;
/// server-side causes are logged instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON format")]
    InvalidJson(#[from] JsonRejection),
    #[error("Validation error")]
    Validation(ValidationErrors),
    #[error("Not found")]
    NotFound,
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

fn internal_error(cause: &dyn std::fmt::Display) -> Response {
    error!("Request failed: {}", cause);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidJson(_) => (StatusCode::BAD_REQUEST, "Invalid JSON format").into_response(),
            Self::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(serde_json::json!(errors))).into_response()
            }
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            Self::User(UserError::UsernameTaken) => {
                (StatusCode::BAD_REQUEST, "Username is already taken").into_response()
            }
            Self::User(e) => internal_error(&e),
            Self::Login(LoginError::InvalidCredentials) => {
                (StatusCode::BAD_REQUEST, "Incorrect username or password").into_response()
            }
            Self::Login(LoginError::Throttled(retry_after)) => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after.as_secs().max(1).to_string())],
                "Too many failed login attempts. Please try again later.",
            )
                .into_response(),
            Self::Login(e) => internal_error(&e),
            Self::Weather(WeatherError::EmptyCity) => {
                (StatusCode::BAD_REQUEST, "City must not be empty").into_response()
            }
            Self::Weather(_) => {
                (StatusCode::BAD_GATEWAY, "Weather service unavailable").into_response()
            }
            Self::Email(EmailError::InvalidAddress(_)) => {
                (StatusCode::BAD_REQUEST, "Invalid email address").into_response()
            }
            Self::Email(_) => (StatusCode::BAD_GATEWAY, "Failed to send email").into_response(),
            Self::Database(e) => internal_error(&e),
        }
    }
}
