use lettre::{message::header::ContentType, Message};
use thiserror::Error;
use tracing::{error, info};

use crate::app::App;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),
    #[error("Failed to build email: {0}")]
    BuilderError(#[from] lettre::error::Error),
    #[error("Mailer error: {0}")]
    MailerError(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for EmailError {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::MailerError(error.to_string())
    }
}

/// Sends a plain-text, single-part email to one recipient.
///
/// Failures are logged here and handed back to the caller, which may ignore
/// them when delivery is best effort.
pub async fn send_mail(app: &App, to: &str, subject: &str, body: String) -> Result<(), EmailError> {
    let result = deliver(app, to, subject, body).await;

    match &result {
        Ok(()) => info!(recipient = to, subject, "Email sent"),
        Err(e) => error!(recipient = to, subject, "Failed to send email: {}", e),
    }

    result
}

async fn deliver(app: &App, to: &str, subject: &str, body: String) -> Result<(), EmailError> {
    let email = Message::builder()
        .from(app.config.email.sender()?)
        .to(to.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body)?;

    app.mailer.send(email).await?;

    Ok(())
}
