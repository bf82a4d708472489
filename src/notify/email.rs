use anyhow::{Context, Result};
use lettre::message::{Mailbox, Message, MultiPart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{Address, AsyncTransport, Tokio1Executor};

use super::{render, Digest, DigestSink};

const SENDER_NAME: &str = "Job Bot";

fn env_required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} missing"))
}

pub struct EmailSink {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailSink {
    /// Reads `SMTP_HOST`, `SMTP_USER`, `SMTP_PASS`, `DIGEST_EMAIL_TO` and
    /// optionally `DIGEST_EMAIL_FROM` (defaults to `SMTP_USER`).
    pub fn from_env() -> Result<Self> {
        let host = env_required("SMTP_HOST")?;
        let user = env_required("SMTP_USER")?;
        let pass = env_required("SMTP_PASS")?;
        let from_addr = std::env::var("DIGEST_EMAIL_FROM").unwrap_or_else(|_| user.clone());
        let to_addr = env_required("DIGEST_EMAIL_TO")?;

        let creds = Credentials::new(user, pass);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
            .context("invalid SMTP_HOST")?
            .credentials(creds)
            .build();

        let from_addr: Address = from_addr.parse().context("invalid DIGEST_EMAIL_FROM")?;
        let from = Mailbox::new(Some(SENDER_NAME.to_string()), from_addr);
        let to: Mailbox = to_addr.parse().context("invalid DIGEST_EMAIL_TO")?;

        Ok(Self { mailer, from, to })
    }

    pub fn build_message(&self, digest: &Digest) -> Result<Message> {
        build_message(self.from.clone(), self.to.clone(), digest)
    }
}

fn build_message(from: Mailbox, to: Mailbox, digest: &Digest) -> Result<Message> {
    Message::builder()
        .from(from)
        .to(to)
        .subject(render::subject(digest))
        .multipart(MultiPart::alternative_plain_html(
            render::text(digest),
            render::html(digest),
        ))
        .context("build email")
}

#[async_trait::async_trait]
impl DigestSink for EmailSink {
    async fn deliver(&self, digest: &Digest) -> Result<()> {
        let msg = self.build_message(digest)?;
        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "email"
    }
}
