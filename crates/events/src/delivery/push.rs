//! Pushover push delivery.
//!
//! One form-encoded POST per message carrying the application token, the
//! user key, the title and the body. No retry: a failed request or a
//! non-success status is logged and the message is lost.

use async_trait::async_trait;
use helpdesk_core::channels::Channel;
use helpdesk_core::recipient::DeliveryTarget;
use helpdesk_core::template::OutboundMessage;

use crate::delivery::{log_misrouted, Notifier};

/// Pushover message endpoint.
pub const PUSH_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Error type for push delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The push service returned a non-2xx status code.
    #[error("Push service returned HTTP {0}")]
    HttpStatus(u16),
}

/// Sends push notifications through the Pushover API.
#[derive(Clone)]
pub struct PushSender {
    client: reqwest::Client,
    endpoint: String,
}

impl PushSender {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: PUSH_API_URL.to_string(),
        }
    }

    /// Post to `endpoint` instead of the public Pushover API.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Send one push message.
    pub async fn deliver(
        &self,
        user_key: &str,
        api_token: &str,
        message: &OutboundMessage,
    ) -> Result<(), PushError> {
        let form = [
            ("token", api_token),
            ("user", user_key),
            ("title", message.subject.as_str()),
            ("message", message.body.as_str()),
        ];

        let response = self.client.post(&self.endpoint).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PushError::HttpStatus(status.as_u16()));
        }

        tracing::info!(title = %message.subject, "Push notification sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for PushSender {
    fn channel(&self) -> Channel {
        Channel::Push
    }

    async fn send(&self, target: DeliveryTarget, message: OutboundMessage) {
        let DeliveryTarget::Push { user_key, api_token } = &target else {
            log_misrouted(Channel::Push, &target);
            return;
        };

        if let Err(e) = self.deliver(user_key, api_token, &message).await {
            tracing::error!(title = %message.subject, error = %e, "Failed to send push notification");
        }
    }
}
