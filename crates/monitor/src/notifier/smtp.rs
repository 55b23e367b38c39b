use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::channel::{Notifier, NotifyError};

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

pub struct SmtpNotifier {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&settings.from)?;
        let creds = Credentials::new(settings.username.clone(), settings.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| NotifyError(format!("smtp relay {}: {e}", settings.host)))?
            .port(settings.port)
            .credentials(creds)
            .build();
        Ok(Self { from, transport })
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, NotifyError> {
    raw.parse()
        .map_err(|e: lettre::address::AddressError| NotifyError(format!("address {raw:?}: {e}")))
}

fn build_message(from: Mailbox, subject: &str, body: &str, to: &str) -> Result<Message, NotifyError> {
    Message::builder()
        .from(from)
        .to(parse_mailbox(to)?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| NotifyError(e.to_string()))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, subject: &str, body: &str, to: &str) -> Result<(), NotifyError> {
        let email = build_message(self.from.clone(), subject, body, to)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError(e.to_string()))?;

        Ok(())
    }
}
