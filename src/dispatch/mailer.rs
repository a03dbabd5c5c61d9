//! Mail transport collaborator.
//!
//! The workflow only sees the `Mailer` trait; `SmtpMailer` is the
//! production implementation over an SMTP relay.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("invalid message: {0}")]
    Message(String),
    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<EmailAttachment>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
}

pub type MailerObject = Arc<dyn Mailer>;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailerError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.relay)
            .map_err(|err| MailerError::Transport(err.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let from: Mailbox = self
            .from_address
            .parse()
            .map_err(|_| MailerError::Message(format!("bad sender address {}", self.from_address)))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|_| MailerError::Message(format!("bad recipient address {}", email.to)))?;

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone());

        let message = match &email.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type)
                    .map_err(|err| MailerError::Message(err.to_string()))?;
                builder
                    .multipart(
                        MultiPart::mixed()
                            .singlepart(SinglePart::plain(email.body.clone()))
                            .singlepart(
                                Attachment::new(attachment.filename.clone())
                                    .body(attachment.bytes.clone(), content_type),
                            ),
                    )
                    .map_err(|err| MailerError::Message(err.to_string()))?
            }
            None => builder
                .body(email.body.clone())
                .map_err(|err| MailerError::Message(err.to_string()))?,
        };

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|err| MailerError::Transport(err.to_string()))
    }
}
