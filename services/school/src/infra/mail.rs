use std::path::Path;

use anyhow::Context as _;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::repository::Mailer;
use crate::error::SchoolServiceError;

/// Sends certificate mail over SMTP with the rendered PDF attached.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_url(smtp_url: &str, mail_from: &str) -> Result<Self, anyhow::Error> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(smtp_url)
            .context("parse smtp url")?
            .build();
        let from = mail_from
            .parse::<Mailbox>()
            .context("parse mail from address")?;
        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    async fn send_certificate(
        &self,
        to: &str,
        username: &str,
        base_url: &str,
        pdf_path: &Path,
    ) -> Result<(), SchoolServiceError> {
        let to = to.parse::<Mailbox>().context("parse recipient address")?;
        let pdf = tokio::fs::read(pdf_path)
            .await
            .context("read certificate pdf")?;

        let filename = format!("{username}_grade_certificate.pdf");
        let pdf_type = "application/pdf"
            .parse::<ContentType>()
            .context("pdf content type")?;
        let body = format!(
            "Hello {username},\n\nAll of your marks are in. Your grade certificate is attached.\n\nYou can review your subjects at {base_url}/subjects.\n"
        );
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Your grade certificate")
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body))
                    .singlepart(Attachment::new(filename).body(pdf, pdf_type)),
            )
            .context("build certificate mail")?;

        self.transport
            .send(message)
            .await
            .context("send certificate mail")?;
        Ok(())
    }
}
