use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::{public::CredentialsRequest, ApiError, ValidatedJson},
    app::App,
    auth::CurrentUser,
    database::models::user::UserView,
    users,
};

/// Greets the caller, mentioning how the weather feels in the default city.
///
/// The weather is optional here: when the lookup fails the greeting is sent
/// without it.
pub async fn greeting(State(app): State<App>, current_user: CurrentUser) -> String {
    match app.weather.get_weather(&app.config.weather.default_city).await {
        Ok(observation) => format!(
            "Hi {}, Weather feels like {}",
            current_user.username, observation.feels_like
        ),
        Err(_) => format!("Hi {}", current_user.username),
    }
}

pub async fn update(
    State(app): State<App>,
    current_user: CurrentUser,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> Result<Json<UserView>, ApiError> {
    let updated = users::update_credentials(
        &app.db,
        current_user.user,
        &request.username,
        &request.password,
    )
    .await?;

    Ok(Json(updated.into()))
}

pub async fn destroy(
    State(app): State<App>,
    current_user: CurrentUser,
) -> Result<StatusCode, ApiError> {
    users::delete_by_id(&app.db, current_user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::{
        tests::setup_test,
        weather::{transport::mock::MockWeatherTransport, WeatherError},
    };

    #[tokio::test]
    async fn test_greeting_requires_token() {
        let test = setup_test().await;

        let response = test.server.get("/user").await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_greeting_rejects_garbage_token() {
        let test = setup_test().await;

        let response = test
            .server
            .get("/user")
            .authorization_bearer("not-a-token")
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_greeting_includes_weather() {
        let test = setup_test().await;
        let token = test.create_user_with_token("alice", "s3cret").await;

        let response = test.server.get("/user").authorization_bearer(token).await;

        response.assert_status_ok();
        response.assert_text(format!(
            "Hi alice, Weather feels like {}",
            MockWeatherTransport::default_observation().feels_like
        ));
    }

    #[tokio::test]
    async fn test_greeting_without_weather() {
        let test = setup_test().await;
        let token = test.create_user_with_token("alice", "s3cret").await;
        test.weather_transport
            .push_response(Err(WeatherError::Status(503)));

        let response = test.server.get("/user").authorization_bearer(token).await;

        response.assert_status_ok();
        response.assert_text("Hi alice");
    }

    #[tokio::test]
    async fn test_update_credentials() {
        let test = setup_test().await;
        let token = test.create_user_with_token("alice", "s3cret").await;

        let response = test
            .server
            .put("/user")
            .authorization_bearer(&token)
            .json(&json!({ "username": "alicia", "password": "n3w" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["username"], "alicia");
        assert!(body.get("password_hash").is_none());

        // The old token names a user that no longer exists
        test.server
            .get("/user")
            .authorization_bearer(&token)
            .await
            .assert_status_unauthorized();

        test.server
            .post("/public")
            .json(&json!({ "username": "alicia", "password": "n3w" }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_update_to_taken_username() {
        let test = setup_test().await;
        test.create_user("bob", "pw").await;
        let token = test.create_user_with_token("alice", "s3cret").await;

        let response = test
            .server
            .put("/user")
            .authorization_bearer(token)
            .json(&json!({ "username": "bob", "password": "pw" }))
            .await;

        response.assert_status_bad_request();
        response.assert_text("Username is already taken");
    }

    #[tokio::test]
    async fn test_delete_account() {
        let test = setup_test().await;
        let token = test.create_user_with_token("alice", "s3cret").await;

        let response = test.server.delete("/user").authorization_bearer(&token).await;

        response.assert_status(StatusCode::NO_CONTENT);
        test.server
            .get("/user")
            .authorization_bearer(&token)
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_token_of_deleted_account_does_not_reach_new_owner_of_the_name() {
        let test = setup_test().await;
        let stale = test.create_user_with_token("mallory", "first").await;
        test.server
            .delete("/user")
            .authorization_bearer(&stale)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let fresh = test.create_user_with_token("mallory", "second").await;
        test.server
            .post("/journal")
            .authorization_bearer(&fresh)
            .json(&json!({ "title": "secret", "content": "diary" }))
            .await
            .assert_status(StatusCode::CREATED);

        test.server
            .get("/journal")
            .authorization_bearer(&stale)
            .await
            .assert_status_unauthorized();
        test.server
            .get("/user")
            .authorization_bearer(&stale)
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_token_of_renamed_account_does_not_reach_new_owner_of_the_name() {
        let test = setup_test().await;
        let stale = test.create_user_with_token("alice", "s3cret").await;
        test.server
            .put("/user")
            .authorization_bearer(&stale)
            .json(&json!({ "username": "alicia", "password": "s3cret" }))
            .await
            .assert_status_ok();

        test.create_user("alice", "other").await;

        test.server
            .get("/journal")
            .authorization_bearer(&stale)
            .await
            .assert_status_unauthorized();
    }
}
