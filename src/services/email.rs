use crate::config::EmailConfig;
use crate::models::contact::ContactRecord;
use anyhow::{Result, anyhow};
use lettre::message::{Mailbox, Message, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

/// SMTP notifier for new contact submissions. Optional: the server runs
/// without it when SMTP is not configured.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Mailer {
    pub fn from_config(config: &EmailConfig) -> Option<Self> {
        let (Some(host), Some(username), Some(password)) = (
            config.smtp_host.as_deref(),
            config.smtp_username.as_deref(),
            config.smtp_password.as_deref(),
        ) else {
            tracing::warn!(
                "Email notifications disabled: SMTP host, username and password are not all configured"
            );
            return None;
        };

        match Self::build(
            host,
            config.smtp_port,
            username,
            password,
            config.smtp_use_tls,
            config.notify_to.as_deref().unwrap_or(username),
        ) {
            Ok(mailer) => Some(mailer),
            Err(err) => {
                tracing::warn!(error = %err, "Email notifications disabled: invalid SMTP configuration");
                None
            }
        }
    }

    fn build(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        use_tls: bool,
        notify_to: &str,
    ) -> Result<Self> {
        let from: Mailbox = username
            .parse()
            .map_err(|e| anyhow!("Invalid sender address '{}': {}", username, e))?;
        let to: Mailbox = notify_to
            .parse()
            .map_err(|e| anyhow!("Invalid notification address '{}': {}", notify_to, e))?;

        let creds = Credentials::new(username.to_string(), password.to_string());
        let transport = if use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
                .port(port)
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .port(port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    pub async fn send_contact_notification(&self, contact: &ContactRecord) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(format!(
                "New contact form submission from {}",
                contact.fullname
            ))
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(contact_notification_html(contact)),
            )?;

        self.transport
            .send(message)
            .await
            .map_err(|e| anyhow!("Failed to send email: {}", e))?;
        Ok(())
    }
}

fn contact_notification_html(contact: &ContactRecord) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px;\">\
         <h2>New Contact Form Submission</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Message:</strong></p>\
         <p style=\"white-space: pre-line;\">{}</p>\
         <p><strong>Submitted:</strong> {}</p>\
         </div>",
        escape_html(&contact.fullname),
        escape_html(&contact.email),
        escape_html(&contact.message),
        contact.timestamp.to_rfc3339(),
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn disabled_when_unconfigured() {
        assert!(Mailer::from_config(&EmailConfig::default()).is_none());
    }

    #[test]
    fn notification_body_escapes_markup() {
        let contact = ContactRecord {
            id: "1".to_string(),
            fullname: "A <script>".to_string(),
            email: "a@example.com".to_string(),
            message: "hi & bye".to_string(),
            timestamp: Utc::now(),
            read: false,
        };
        let html = contact_notification_html(&contact);
        assert!(html.contains("A &lt;script&gt;"));
        assert!(html.contains("hi &amp; bye"));
        assert!(!html.contains("<script>"));
    }
}
