use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{ApiError, ValidatedJson},
    app::App,
    auth,
    users::{self, UserError},
};

/// Username and password pair, as sent to signup, login and credential updates.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[serde(alias = "userName")]
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

pub async fn signup(
    State(app): State<App>,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> Result<(StatusCode, &'static str), ApiError> {
    match users::register_user(&app.db, &request.username, &request.password).await {
        Ok(_) => Ok((StatusCode::CREATED, "User created successfully")),
        Err(UserError::UsernameTaken) => Ok((StatusCode::BAD_REQUEST, "Failed to create user")),
        Err(e) => Err(e.into()),
    }
}

/// Exchanges credentials for a bearer token, returned as plain text.
pub async fn login(
    State(app): State<App>,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> Result<String, ApiError> {
    Ok(auth::login(&app, &request.username, &request.password).await?)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::tests::setup_test;

    #[tokio::test]
    async fn test_health_check() {
        let test = setup_test().await;

        let response = test.server.get("/public/health-check").await;

        response.assert_status_ok();
        response.assert_text("Health is ok !");
    }

    #[tokio::test]
    async fn test_signup_creates_user() {
        let test = setup_test().await;

        let response = test
            .server
            .post("/public/signup")
            .json(&json!({ "username": "alice", "password": "s3cret" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.assert_text("User created successfully");
    }

    #[tokio::test]
    async fn test_signup_accepts_legacy_field_name() {
        let test = setup_test().await;

        let response = test
            .server
            .post("/public/signup")
            .json(&json!({ "userName": "alice", "password": "s3cret" }))
            .await;

        response.assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_signup_with_taken_username_fails() {
        let test = setup_test().await;
        test.create_user("alice", "s3cret").await;

        let response = test
            .server
            .post("/public/signup")
            .json(&json!({ "username": "alice", "password": "other" }))
            .await;

        response.assert_status_bad_request();
        response.assert_text("Failed to create user");
    }

    #[tokio::test]
    async fn test_signup_with_empty_password_is_invalid() {
        let test = setup_test().await;

        let response = test
            .server
            .post("/public/signup")
            .json(&json!({ "username": "alice", "password": "" }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_signup_with_malformed_json() {
        let test = setup_test().await;

        let response = test
            .server
            .post("/public/signup")
            .content_type("application/json")
            .text("{not json")
            .await;

        response.assert_status_bad_request();
        response.assert_text("Invalid JSON format");
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let test = setup_test().await;
        test.create_user("alice", "s3cret").await;

        let response = test
            .server
            .post("/public")
            .json(&json!({ "username": "alice", "password": "s3cret" }))
            .await;

        response.assert_status_ok();
        assert!(!response.text().is_empty());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let test = setup_test().await;
        test.create_user("alice", "s3cret").await;

        let wrong_password = test
            .server
            .post("/public")
            .json(&json!({ "username": "alice", "password": "nope" }))
            .await;
        let unknown_user = test
            .server
            .post("/public")
            .json(&json!({ "username": "nobody", "password": "s3cret" }))
            .await;

        wrong_password.assert_status_bad_request();
        unknown_user.assert_status_bad_request();
        assert_eq!(wrong_password.text(), unknown_user.text());
        wrong_password.assert_text("Incorrect username or password");
    }

    #[tokio::test]
    async fn test_login_is_throttled_after_repeated_failures() {
        let test = setup_test().await;
        test.create_user("alice", "s3cret").await;

        for _ in 0..test.config.login_throttle.max_failures {
            test.server
                .post("/public")
                .json(&json!({ "username": "alice", "password": "nope" }))
                .await
                .assert_status_bad_request();
        }

        let response = test
            .server
            .post("/public")
            .json(&json!({ "username": "alice", "password": "s3cret" }))
            .await;

        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
    }
}
