use std::{sync::LazyLock, time::Duration};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    app::App,
    auth::jwt,
    password::{hash_password, verify_password},
    users,
};

/// Hash checked when the username is unknown, so both failure paths cost the same.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("dummy-password").unwrap_or_default());

#[derive(Debug, Error)]
pub enum LoginError {
    /// Unknown user, wrong password, or a failed lookup; deliberately indistinguishable
    #[error("Incorrect username or password")]
    InvalidCredentials,
    #[error("Too many failed login attempts")]
    Throttled(Duration),
    #[error("Failed to issue token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Verify credentials and issue a signed token for the user.
pub async fn login(app: &App, username: &str, password: &str) -> Result<String, LoginError> {
    // Reserved before the first await; pending attempts count as failures
    let attempt = app
        .login_throttle
        .begin_attempt(username)
        .map_err(LoginError::Throttled)?;

    let user = match users::find_by_username(&app.db, username).await {
        Ok(user) => user,
        Err(e) => {
            error!(username, "User lookup failed during login: {}", e);
            None
        }
    };

    let hash = user
        .as_ref()
        .map_or(DUMMY_HASH.as_str(), |user| user.password_hash.as_str());

    let verified = verify_password(password, hash).unwrap_or_else(|e| {
        error!(username, "Password verification failed: {}", e);
        false
    });

    let Some(user) = user.filter(|_| verified) else {
        warn!(username, "Failed login attempt");
        attempt.failed();
        return Err(LoginError::InvalidCredentials);
    };

    attempt.succeeded();

    let token = jwt::generate_token(&app.config, user.id, &user.username, user.role_list())?;
    info!(username, "User logged in");

    Ok(token)
}
