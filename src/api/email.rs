use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{ApiError, ValidatedJson},
    app::App,
    auth::CurrentUser,
    emails::send_mail,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendEmailRequest {
    #[validate(email)]
    pub to: String,
    #[validate(length(min = 1, max = 255))]
    pub subject: String,
    pub body: String,
}

pub async fn send(
    State(app): State<App>,
    _current_user: CurrentUser,
    ValidatedJson(request): ValidatedJson<SendEmailRequest>,
) -> Result<&'static str, ApiError> {
    send_mail(&app, &request.to, &request.subject, request.body).await?;

    Ok("Email sent")
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::tests::setup_test;

    #[tokio::test]
    async fn test_sends_plain_text_email() {
        let test = setup_test().await;
        let token = test.create_user_with_token("alice", "s3cret").await;

        let response = test
            .server
            .post("/email/send")
            .authorization_bearer(token)
            .json(&json!({
                "to": "friend@example.com",
                "subject": "Hello",
                "body": "Greetings from the journal"
            }))
            .await;

        response.assert_status_ok();

        let sent = test.sent_emails();
        assert_eq!(sent.len(), 1);
        let formatted = String::from_utf8_lossy(&sent[0].formatted()).to_string();
        assert!(formatted.contains("Subject: Hello"));
        assert!(formatted.contains("Content-Type: text/plain"));
        assert!(formatted.contains("Greetings from the journal"));
        assert_eq!(
            sent[0].envelope().to()[0].to_string(),
            "friend@example.com"
        );
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected() {
        let test = setup_test().await;
        let token = test.create_user_with_token("alice", "s3cret").await;

        let response = test
            .server
            .post("/email/send")
            .authorization_bearer(token)
            .json(&json!({ "to": "not an address", "subject": "Hi", "body": "" }))
            .await;

        response.assert_status_bad_request();
        assert!(test.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_bad_gateway() {
        let test = setup_test().await;
        let token = test.create_user_with_token("alice", "s3cret").await;
        test.mailer
            .mock_transport()
            .expect("Mock mailer should be used in tests")
            .set_failing(true);

        let response = test
            .server
            .post("/email/send")
            .authorization_bearer(token)
            .json(&json!({ "to": "friend@example.com", "subject": "Hi", "body": "x" }))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
    }
}
