use async_trait::async_trait;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

use super::{MailError, Mailer, OutgoingMail};

/// SMTP client built once at start-up and shared by all workers.
///
/// `SmtpTransport` is blocking, so each send runs on the blocking pool.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Implicit-TLS relay (port 465 style) authenticated with `user`/`pass`
    pub fn new(host: &str, port: u16, user: &str, pass: &str) -> Result<Self, MailError> {
        let transport = SmtpTransport::relay(host)?
            .port(port)
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();
        Ok(Self { transport })
    }

    /// Open a connection and issue NOOP to check reachability and credentials
    pub async fn verify(&self) -> Result<bool, MailError> {
        let transport = self.transport.clone();
        let ready = tokio::task::spawn_blocking(move || transport.test_connection()).await??;
        Ok(ready)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_message(&self, mail: OutgoingMail) -> Result<String, MailError> {
        debug!("sending email to {}", mail.to);

        let message = Message::builder()
            .from(mail.from.parse()?)
            .to(mail.to.parse()?)
            .subject(mail.subject)
            .multipart(MultiPart::alternative_plain_html(mail.text, mail.html))?;

        let transport = self.transport.clone();
        let response = tokio::task::spawn_blocking(move || transport.send(&message)).await??;

        let delivery_id = response
            .message()
            .map(|line| line.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        Ok(delivery_id)
    }
}
