use std::{
    fmt::{self, Debug},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use lettre::{
    transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport, Message,
    Tokio1Executor,
};

use crate::config::EmailConfig;

/// Mock transport that captures sent emails for testing.
///
/// Can be switched into a failing mode to exercise delivery errors.
#[derive(Clone, Default)]
pub struct MockTransport {
    messages: Arc<Mutex<Vec<Message>>>,
    failing: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get all sent messages
    pub fn messages(&self) -> Vec<Message> {
        self.lock().clone()
    }

    /// Make subsequent sends fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

/// Mailer that can be either a real SMTP transport or a mock for testing.
#[derive(Clone)]
pub enum Mailer {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Mock(MockTransport),
}

impl Debug for Mailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smtp(_) => f.debug_tuple("Mailer::Smtp").finish(),
            Self::Mock(_) => f.debug_tuple("Mailer::Mock").finish(),
        }
    }
}

impl Mailer {
    pub fn mock() -> Self {
        Self::Mock(MockTransport::new())
    }

    /// Build the mailer described by the `email` configuration section.
    pub fn from_config(config: &EmailConfig) -> Result<Self, lettre::transport::smtp::Error> {
        match config {
            EmailConfig::Mock => Ok(Self::mock()),
            EmailConfig::Smtp {
                host,
                port,
                username,
                password,
                use_tls,
                ..
            } => {
                let mut builder = if *use_tls {
                    AsyncSmtpTransport::<Tokio1Executor>::relay(host)?.port(*port)
                } else {
                    AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(*port)
                };

                if let (Some(username), Some(password)) = (username, password) {
                    builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
                }

                Ok(Self::Smtp(builder.build()))
            }
        }
    }

    /// Send an email. For mock transport, stores the message for later inspection.
    pub async fn send(
        &self,
        message: Message,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match self {
            Self::Smtp(transport) => {
                transport.send(message).await?;
                Ok(())
            }
            Self::Mock(mock) => {
                if mock.failing.load(Ordering::SeqCst) {
                    return Err("mock transport rejected the message".into());
                }

                mock.lock().push(message);
                Ok(())
            }
        }
    }

    /// Get sent emails (only available for mock mailer)
    pub fn messages(&self) -> Option<Vec<Message>> {
        match self {
            Self::Mock(transport) => Some(transport.messages()),
            Self::Smtp(_) => None,
        }
    }

    /// The mock transport, when this is a mock mailer
    pub fn mock_transport(&self) -> Option<&MockTransport> {
        match self {
            Self::Mock(transport) => Some(transport),
            Self::Smtp(_) => None,
        }
    }
}
