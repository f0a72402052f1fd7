//! Channel senders.
//!
//! Each sender performs exactly one delivery attempt per call. The
//! `deliver` methods return a typed error for tests and callers that want
//! it; the [`Notifier::send`] entry point used by the dispatcher logs every
//! failure and returns nothing.

pub mod gateway;
pub mod mail;
pub mod push;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use helpdesk_core::channels::Channel;
use helpdesk_core::recipient::DeliveryTarget;
use helpdesk_core::template::OutboundMessage;

/// HTTP request timeout for push and gateway deliveries.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by the push and gateway senders.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()
}

/// A single delivery channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// The channel this notifier serves.
    fn channel(&self) -> Channel;

    /// Attempt one delivery. Never fails: errors are logged and swallowed.
    async fn send(&self, target: DeliveryTarget, message: OutboundMessage);
}

/// The notifier for each channel.
#[derive(Clone)]
pub struct ChannelSenders {
    email: Arc<dyn Notifier>,
    push: Arc<dyn Notifier>,
    gateway: Arc<dyn Notifier>,
}

impl ChannelSenders {
    pub fn new(
        email: Arc<dyn Notifier>,
        push: Arc<dyn Notifier>,
        gateway: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            email,
            push,
            gateway,
        }
    }

    pub fn for_channel(&self, channel: Channel) -> Arc<dyn Notifier> {
        match channel {
            Channel::Email => Arc::clone(&self.email),
            Channel::Push => Arc::clone(&self.push),
            Channel::Gateway => Arc::clone(&self.gateway),
        }
    }
}

/// Log that a notifier received a target for another channel.
pub(crate) fn log_misrouted(expected: Channel, target: &DeliveryTarget) {
    tracing::error!(
        channel = %expected,
        target_channel = %target.channel(),
        "Delivery target does not belong to this channel"
    );
}
