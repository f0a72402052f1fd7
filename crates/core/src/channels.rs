//! Well-known notification channel names.
//!
//! These appear as the `channel` field on every delivery log line and as
//! the labels of background sends.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direct email delivered via SMTP.
pub const CHANNEL_EMAIL: &str = "email";

/// Push notification delivered through the push service's message API.
pub const CHANNEL_PUSH: &str = "push";

/// Message submitted through a per-user multi-service gateway URL.
pub const CHANNEL_GATEWAY: &str = "gateway";

/// One independent delivery mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Push,
    Gateway,
}

impl Channel {
    /// All channels in the order the dispatcher considers them.
    pub const ALL: [Channel; 3] = [Channel::Push, Channel::Email, Channel::Gateway];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Email => CHANNEL_EMAIL,
            Channel::Push => CHANNEL_PUSH,
            Channel::Gateway => CHANNEL_GATEWAY,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
