//! SMTP mail delivery
//!
//! Sends plain-text messages with attachments through a STARTTLS relay
//! using lettre's async transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{debug, info};

use crate::config::{ConfigProvider, ServiceConfig, SmtpConfig, DEFAULT_PROVIDER};
use crate::core::{MailTransport, OutgoingEmail};
use crate::error::{ErrorContext, Result, ServiceError};

/// Mail transport backed by an SMTP relay
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new_with_config(config: SmtpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new_with_config(SmtpConfig::from_provider(&**DEFAULT_PROVIDER)?)
    }

    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        Self::new_with_config(SmtpConfig::from_provider(provider)?)
    }

    /// The configured login, also used as the sender address
    pub fn username(&self) -> Option<&str> {
        self.config.username.as_deref()
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let (username, password) = match (&self.config.username, &self.config.password) {
            (Some(username), Some(password)) => (username.clone(), password.clone()),
            _ => {
                return Err(ServiceError::configuration(
                    "EMAIL_USERNAME and EMAIL_PASSWORD must be set to send mail",
                ))
            }
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server)?
            .port(self.config.port)
            .credentials(Credentials::new(username, password))
            .build();

        Ok(transport)
    }
}

/// Build the MIME message for an outgoing email
pub fn build_message(email: &OutgoingEmail) -> Result<Message> {
    if email.to.is_empty() {
        return Err(ServiceError::validation("Email has no recipients"));
    }

    let mut builder = Message::builder()
        .from(email.from.parse::<Mailbox>()?)
        .subject(email.subject.clone());

    for recipient in &email.to {
        builder = builder.to(recipient.parse::<Mailbox>()?);
    }

    let mut body = MultiPart::mixed().singlepart(SinglePart::plain(email.body.clone()));
    for attachment in &email.attachments {
        let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
            ServiceError::validation(format!(
                "Invalid content type '{}': {}",
                attachment.content_type, e
            ))
        })?;
        body = body.singlepart(
            Attachment::new(attachment.filename.clone())
                .body(attachment.data.clone(), content_type),
        );
    }

    Ok(builder.multipart(body)?)
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let message = build_message(&email)?;
        let transport = self.transport()?;

        debug!(
            "Sending '{}' to {} recipient(s) via {}:{}",
            email.subject,
            email.to.len(),
            self.config.server,
            self.config.port
        );

        let response = transport.send(message).await.map_err(|e| {
            ServiceError::from(e).with_context(
                ErrorContext::for_service("smtp")
                    .endpoint(format!("{}:{}", self.config.server, self.config.port)),
            )
        })?;

        info!("SMTP relay accepted message with code {}", response.code());
        Ok(())
    }
}
