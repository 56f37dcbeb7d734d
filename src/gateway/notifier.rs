//! Outbound email dispatch.
//!
//! Email is best-effort everywhere in this system: a failed send is logged as
//! a dependency failure and never rolls back the operation that triggered it.

use crate::config::SmtpConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MessagePart, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

/// An attachment for an outbound email.
#[derive(Clone, Debug)]
pub struct EmailAttachment {
    /// File name shown to the recipient
    pub filename: String,
    /// MIME type of the payload
    pub content_type: String,
    /// Raw payload
    pub bytes: Vec<u8>,
}

/// An outbound email.
#[derive(Clone, Debug)]
pub struct EmailMessage {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
    /// Plain-text body
    pub text: String,
    /// Optional attachment
    pub attachment: Option<EmailAttachment>,
}

/// Best-effort email dispatch.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one email.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dependency`] when the send fails; callers fire and
    /// forget via [`send_best_effort`].
    async fn send(&self, message: EmailMessage) -> Result<()>;
}

/// Dispatch an email without awaiting it or letting a failure propagate.
pub fn send_best_effort(notifier: Arc<dyn Notifier>, message: EmailMessage) {
    tokio::spawn(async move {
        let to = message.to.clone();
        let subject = message.subject.clone();
        if let Err(error) = notifier.send(message).await {
            tracing::warn!(%to, %subject, %error, "email dispatch failed");
        }
    });
}

/// SMTP notifier backed by Lettre.
#[derive(Clone)]
pub struct SmtpNotifier {
    /// SMTP relay host
    server: String,
    /// SMTP port
    port: u16,
    /// SMTP credentials
    credentials: Credentials,
    /// Sender email address
    from_email: String,
    /// Sender display name
    from_name: String,
}

impl SmtpNotifier {
    /// Build an SMTP notifier from configuration.
    #[must_use]
    pub fn from_config(config: &SmtpConfig) -> Self {
        Self {
            server: config.server.clone(),
            port: config.port,
            credentials: Credentials::new(config.username.clone(), config.password.clone()),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        }
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        Ok(AsyncSmtpTransport::<Tokio1Executor>::relay(&self.server)
            .map_err(|e| Error::Dependency(format!("SMTP relay error: {e}")))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn from_mailbox(&self) -> Result<Mailbox> {
        format!("{} <{}>", self.from_name, self.from_email)
            .parse()
            .map_err(|e| Error::Dependency(format!("invalid sender address: {e}")))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| Error::Dependency(format!("invalid recipient address: {e}")))?;

        let alternative = MultiPart::alternative_plain_html(message.text, message.html);
        let body = match message.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type)
                    .map_err(|e| Error::Dependency(format!("invalid content type: {e}")))?;
                MultiPart::mixed()
                    .multipart(alternative)
                    .singlepart(MessagePart::new(attachment.filename).body(attachment.bytes, content_type))
            }
            None => alternative,
        };

        let email = Message::builder()
            .from(self.from_mailbox()?)
            .to(to)
            .subject(message.subject)
            .multipart(body)
            .map_err(|e| Error::Dependency(format!("failed to build email: {e}")))?;

        self.build_transport()?
            .send(email)
            .await
            .map_err(|e| Error::Dependency(format!("SMTP send failed: {e}")))?;

        Ok(())
    }
}

/// Console notifier for development: logs the email instead of sending it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            attachment = message.attachment.as_ref().map(|a| a.filename.as_str()),
            body = %message.text,
            "email (console notifier)"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn console_notifier_accepts_messages() {
        let notifier = ConsoleNotifier;
        let result = notifier
            .send(EmailMessage {
                to: "test@example.com".to_string(),
                subject: "Booking Confirmation".to_string(),
                html: "<p>hi</p>".to_string(),
                text: "hi".to_string(),
                attachment: None,
            })
            .await;
        assert!(result.is_ok());
    }
}
