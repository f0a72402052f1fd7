//! Email notification delivery via SMTP.
//!
//! [`MailSender`] wraps the `lettre` async SMTP transport to send one
//! plain-text message per call. Relay settings are read from the settings
//! store on every send, so a change made by an administrator applies to the
//! next notification without a restart.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use helpdesk_core::channels::Channel;
use helpdesk_core::mail_settings::{MailSettings, MAIL_KEYS};
use helpdesk_core::recipient::DeliveryTarget;
use helpdesk_core::template::OutboundMessage;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::delivery::{log_misrouted, Notifier};
use crate::ports::{SettingsError, SettingsSource};

/// Connection and command timeout for a notification send.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The relay host or sender address is not configured.
    #[error("Mail not configured: {0} is not set")]
    NotConfigured(&'static str),

    /// The settings store could not be read.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// SMTP transport-level failure (connection, TLS, authentication, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Build an SMTP transport for `host` from the settings snapshot.
///
/// With `use_tls` the connection must upgrade via STARTTLS; without it the
/// session stays plaintext. Credentials are attached only when both a
/// username and a password are configured.
pub(crate) fn build_transport(
    host: &str,
    settings: &MailSettings,
    timeout: Duration,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, lettre::transport::smtp::Error> {
    let mut builder = if settings.use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
    };
    builder = builder.port(settings.port).timeout(Some(timeout));

    if let Some((user, pass)) = settings.credentials() {
        builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
    }

    Ok(builder.build())
}

// ---------------------------------------------------------------------------
// MailSender
// ---------------------------------------------------------------------------

/// Sends notification emails using the relay configured in the settings
/// store.
pub struct MailSender {
    settings: Arc<dyn SettingsSource>,
}

impl MailSender {
    pub fn new(settings: Arc<dyn SettingsSource>) -> Self {
        Self { settings }
    }

    /// Read the current settings and send one message to `to_email`.
    pub async fn deliver(&self, to_email: &str, message: &OutboundMessage) -> Result<(), MailError> {
        let raw = self.settings.load(&MAIL_KEYS).await?;
        let (settings, rejected_port) = MailSettings::from_map_lenient(&raw);
        if let Some(e) = rejected_port {
            tracing::error!(
                error = %e,
                fallback_port = settings.port,
                "Invalid SMTP port in settings, using default for this send"
            );
        }

        let host = settings
            .host
            .as_deref()
            .ok_or(MailError::NotConfigured("smtp_server"))?;
        let from = settings
            .from_address
            .as_deref()
            .ok_or(MailError::NotConfigured("smtp_from_email"))?;

        let email = Message::builder()
            .from(from.parse()?)
            .to(to_email.parse()?)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))?;

        let mailer = build_transport(host, &settings, SEND_TIMEOUT)?;
        mailer.send(email).await?;

        tracing::info!(
            to = to_email,
            smtp_server = host,
            smtp_port = settings.port,
            use_tls = settings.use_tls,
            "Notification email sent"
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for MailSender {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, target: DeliveryTarget, message: OutboundMessage) {
        let DeliveryTarget::Email { to } = &target else {
            log_misrouted(Channel::Email, &target);
            return;
        };

        match self.deliver(to, &message).await {
            Ok(()) => {}
            Err(e @ MailError::NotConfigured(_)) => {
                tracing::warn!(to = %to, error = %e, "Email notification skipped");
            }
            Err(e) => {
                tracing::error!(to = %to, subject = %message.subject, error = %e, "Failed to send email notification");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
