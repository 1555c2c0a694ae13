//! Email dispatch over SMTP.
//!
//! The transport is created lazily on first send: with credentials
//! configured it is a real SMTP relay, without them a stub that accepts and
//! discards messages (delivery is still logged). Batch sends fan out
//! concurrently and tolerate per-recipient failure.

pub mod templates;

pub use templates::EmailContent;

use futures::future::join_all;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::stub::AsyncStubTransport;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::config::EmailConfig;
use crate::error::{AppError, EmailError};

enum Mailer {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Stub(AsyncStubTransport),
}

/// Outcome of a batch send. Failures are data, not errors: one recipient
/// failing never aborts the batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: Vec<String>,
}

#[derive(Clone, Copy)]
enum Broadcast<'a> {
    Promotional(Option<&'a str>),
    Launch,
}

pub struct EmailService {
    config: EmailConfig,
    mailer: OnceCell<Mailer>,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            mailer: OnceCell::new(),
        }
    }

    /// One-time transport initialization. Concurrent first callers await the
    /// same outcome rather than building duplicate transports.
    async fn mailer(&self) -> Result<&Mailer, AppError> {
        self.mailer
            .get_or_try_init(|| async { self.build_mailer() })
            .await
    }

    fn build_mailer(&self) -> Result<Mailer, AppError> {
        if self.config.username.is_empty() || self.config.password.is_empty() {
            warn!("no smtp credentials configured, using stub transport (messages are logged and discarded)");
            return Ok(Mailer::Stub(AsyncStubTransport::new_ok()));
        }

        let builder = if self.config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
        }
        .map_err(|e| EmailError::Transport(e.to_string()))?;

        let transport = builder
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        info!("smtp transport configured for {}", self.config.host);
        Ok(Mailer::Smtp(transport))
    }

    async fn send(&self, to: &str, content: EmailContent) -> Result<(), AppError> {
        let to: Mailbox = to.parse()?;
        let from: Mailbox = self.config.from.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(content.subject)
            .header(ContentType::TEXT_HTML)
            .body(content.html)?;

        match self.mailer().await? {
            Mailer::Smtp(transport) => {
                transport
                    .send(message)
                    .await
                    .map_err(|e| EmailError::Transport(e.to_string()))?;
            }
            Mailer::Stub(transport) => {
                transport
                    .send(message)
                    .await
                    .map_err(|e| EmailError::Transport(e.to_string()))?;
            }
        }

        Ok(())
    }

    pub async fn send_welcome_email(&self, email: &str) -> Result<(), AppError> {
        info!("sending welcome email to {email}");
        self.send(email, templates::welcome_email(email)).await
    }

    pub async fn send_promotional_email(
        &self,
        email: &str,
        custom_message: Option<&str>,
    ) -> Result<(), AppError> {
        self.send(email, templates::promotional_email(email, custom_message))
            .await
    }

    pub async fn send_launch_email(&self, email: &str) -> Result<(), AppError> {
        self.send(email, templates::launch_email(email)).await
    }

    pub async fn send_promotional_to_all(
        &self,
        recipients: &[String],
        custom_message: Option<&str>,
    ) -> BatchOutcome {
        self.broadcast(recipients, Broadcast::Promotional(custom_message))
            .await
    }

    pub async fn send_launch_to_all(&self, recipients: &[String]) -> BatchOutcome {
        self.broadcast(recipients, Broadcast::Launch).await
    }

    async fn broadcast(&self, recipients: &[String], kind: Broadcast<'_>) -> BatchOutcome {
        let sends = recipients.iter().map(|email| async move {
            let result = match kind {
                Broadcast::Promotional(message) => {
                    self.send_promotional_email(email, message).await
                }
                Broadcast::Launch => self.send_launch_email(email).await,
            };

            match result {
                Ok(()) => Ok(()),
                Err(e) => {
                    error!("failed to send email to {email}: {e}");
                    Err(email.clone())
                }
            }
        });

        let mut delivered = 0;
        let mut failed = Vec::new();
        for result in join_all(sends).await {
            match result {
                Ok(()) => delivered += 1,
                Err(email) => failed.push(email),
            }
        }

        BatchOutcome {
            attempted: recipients.len(),
            delivered,
            failed,
        }
    }
}
