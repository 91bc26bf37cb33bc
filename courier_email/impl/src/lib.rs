use anyhow::{anyhow, Context};
use courier_email_contracts::MailTransport;
use courier_models::mail::{MailBodyKind, MailPriority, OutboundMail};
use lettre::{
    message::header::{self, Header, HeaderName, HeaderValue},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[derive(Debug, Clone)]
pub struct SmtpTransportConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    /// Charset advertised in the `Content-Type` of outgoing messages.
    pub encoding: String,
}

#[derive(Debug, Clone)]
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    plain: header::ContentType,
    html: header::ContentType,
}

impl SmtpMailTransport {
    pub fn new(config: &SmtpTransportConfig) -> anyhow::Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .context("Failed to configure smtp relay")?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        if let Some(port) = config.port {
            builder = builder.port(port);
        }
        Ok(Self {
            transport: builder.build(),
            plain: content_type("text/plain", &config.encoding)?,
            html: content_type("text/html", &config.encoding)?,
        })
    }

    fn build_message(&self, mail: OutboundMail) -> anyhow::Result<Message> {
        let mut builder = Message::builder()
            .from(mail.from.into_mailbox())
            .subject(mail.subject)
            .header(XPriority(mail.priority))
            .header(match mail.kind {
                MailBodyKind::Plain => self.plain.clone(),
                MailBodyKind::Html => self.html.clone(),
            });
        for recipient in mail.to {
            builder = builder.to(recipient.into_mailbox());
        }
        for recipient in mail.cc {
            builder = builder.cc(recipient.into_mailbox());
        }
        for recipient in mail.bcc {
            builder = builder.bcc(recipient.into_mailbox());
        }
        builder.body(mail.body).map_err(Into::into)
    }
}

impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: OutboundMail) -> anyhow::Result<bool> {
        let message = self.build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map(|response| response.is_positive())
            .map_err(Into::into)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

fn content_type(mime: &str, charset: &str) -> anyhow::Result<header::ContentType> {
    header::ContentType::parse(&format!("{mime}; charset={charset}"))
        .with_context(|| format!("Unusable mail encoding {charset:?}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct XPriority(MailPriority);

impl Header for XPriority {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Priority")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let priority = match s.trim() {
            "1" => MailPriority::Highest,
            "2" => MailPriority::High,
            "3" => MailPriority::Normal,
            "4" => MailPriority::Low,
            "5" => MailPriority::Lowest,
            other => return Err(format!("Invalid X-Priority value {other:?}").into()),
        };
        Ok(Self(priority))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.x_priority().to_string())
    }
}
