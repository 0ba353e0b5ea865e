use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{
    app::App,
    auth::jwt,
    database::models::{role::Role, user},
    users,
};

/// Authenticated user extracted from the bearer token.
///
/// Loads the full user record named by the token's subject. Use this in
/// handlers that require authentication.
///
/// # Example
/// ```rust,ignore
/// pub async fn show(current_user: CurrentUser) -> String {
///     format!("Hi {}", current_user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: user::Model,
}

impl std::ops::Deref for CurrentUser {
    type Target = user::Model;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

/// Authenticated user holding the `ADMIN` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl std::ops::Deref for AdminUser {
    type Target = user::Model;

    fn deref(&self) -> &Self::Target {
        &self.0.user
    }
}

/// Rejection for the authentication extractors.
#[derive(Debug)]
pub enum AuthRejection {
    /// Missing, malformed, expired, or orphaned token
    Unauthorized,
    /// Authenticated but lacking the required role
    Forbidden,
    /// Database error while loading user
    DatabaseError,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            Self::DatabaseError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    App: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AuthRejection::Unauthorized)?;

        let app = App::from_ref(state);
        let claims =
            jwt::verify_token(&app.config, token).map_err(|_| AuthRejection::Unauthorized)?;

        // The account may have been renamed or deleted since the token was
        // issued, and its name taken by someone else
        let user = users::find_by_id(&app.db, claims.uid)
            .await
            .map_err(|e| {
                error!("Failed to load authenticated user: {}", e);
                AuthRejection::DatabaseError
            })?
            .filter(|user| user.username == claims.sub)
            .ok_or(AuthRejection::Unauthorized)?;

        Ok(Self { user })
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    App: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let current_user = CurrentUser::from_request_parts(parts, state).await?;

        // Roles are read from the stored record, not the token, so revocations apply at once
        if !current_user.has_role(Role::Admin) {
            return Err(AuthRejection::Forbidden);
        }

        Ok(Self(current_user))
    }
}
