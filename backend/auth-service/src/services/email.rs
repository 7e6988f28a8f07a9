/// Mailer for the forgot-password temporary-credential notice
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::EmailSettings;
use crate::error::{AuthError, Result};

/// Async SMTP transport wrapper.
///
/// If no SMTP host is configured the mailer operates in no-op mode and only
/// logs, which keeps development and tests free of email infrastructure.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
}

impl Mailer {
    pub fn new(config: &EmailSettings) -> Result<Self> {
        let from = config
            .smtp_from
            .parse::<Mailbox>()
            .map_err(|e| AuthError::Internal(format!("Invalid SMTP_FROM address: {}", e)))?;

        let transport = if config.smtp_host.trim().is_empty() {
            warn!("SMTP host not configured; mailer will operate in no-op mode");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            }
            .map_err(|e| {
                AuthError::Internal(format!("Failed to configure SMTP transport: {}", e))
            })?
            .port(config.smtp_port);

            let builder = if let (Some(username), Some(password)) =
                (&config.smtp_username, &config.smtp_password)
            {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            } else {
                builder
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self { transport, from })
    }

    /// A mailer that never sends; used where email is irrelevant.
    pub fn disabled() -> Self {
        Self {
            transport: None,
            from: "no-reply@theknow.dev"
                .parse()
                .expect("default sender address is valid"),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send the temporary-password notice after a forgot-password reset.
    pub async fn send_temporary_password(
        &self,
        recipient: &str,
        full_name: &str,
        temp_password: &str,
    ) -> Result<()> {
        let body = format!(
            "Hello {},\n\nYour new temporary password is: {}\n\nUse this password to log in to your account, then follow the steps to choose a new password.\n\nBest,\nTheKnow Team",
            full_name, temp_password
        );
        self.send_mail(recipient, "TheKnow - Forgot Password", &body)
            .await
    }

    async fn send_mail(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let Some(transport) = &self.transport else {
            info!(recipient = %recipient, subject = %subject, "Mailer disabled; skipping send");
            return Ok(());
        };

        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| AuthError::Internal(format!("Invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| AuthError::Internal(format!("Failed to build message: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AuthError::Internal(format!("Failed to send mail: {}", e)))?;

        info!(recipient = %recipient, "Mail sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailSettings;

    fn noop_settings() -> EmailSettings {
        EmailSettings {
            smtp_host: String::new(),
            smtp_port: 465,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "no-reply@theknow.dev".into(),
            use_starttls: false,
        }
    }

    #[tokio::test]
    async fn test_noop_mailer_accepts_sends() {
        let mailer = Mailer::new(&noop_settings()).expect("mailer builds");
        assert!(!mailer.is_enabled());
        mailer
            .send_temporary_password("a@x.com", "Ada Lovelace", "temp-password")
            .await
            .expect("no-op send succeeds");
    }

    #[test]
    fn test_invalid_from_address_rejected() {
        let mut settings = noop_settings();
        settings.smtp_from = "not an address".into();
        assert!(Mailer::new(&settings).is_err());
    }
}
