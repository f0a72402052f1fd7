//! The notification profile of a user and the channel selection rule.

use crate::channels::Channel;
use crate::types::DbId;

/// Contact fields and per-channel enable flags of one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipient {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    pub push_user_key: Option<String>,
    pub push_api_token: Option<String>,
    pub gateway_url: Option<String>,
    pub notify_email: bool,
    pub notify_push: bool,
    pub notify_gateway: bool,
}

/// Where a single send goes. Carries exactly the credentials its channel
/// needs.
#[derive(Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    Email { to: String },
    Push { user_key: String, api_token: String },
    Gateway { url: String },
}

impl DeliveryTarget {
    pub fn channel(&self) -> Channel {
        match self {
            DeliveryTarget::Email { .. } => Channel::Email,
            DeliveryTarget::Push { .. } => Channel::Push,
            DeliveryTarget::Gateway { .. } => Channel::Gateway,
        }
    }
}

// Credentials stay out of Debug output so targets can be logged freely.
impl std::fmt::Debug for DeliveryTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryTarget::Email { to } => f.debug_struct("Email").field("to", to).finish(),
            DeliveryTarget::Push { .. } => f.debug_struct("Push").finish_non_exhaustive(),
            DeliveryTarget::Gateway { .. } => f.debug_struct("Gateway").finish_non_exhaustive(),
        }
    }
}

/// Returns the trimmed value if it is present and non-blank.
fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Recipient {
    /// The delivery targets this user should receive, one per channel at
    /// most.
    ///
    /// A channel is selected only when its flag is set and every credential
    /// it needs is non-empty. Order follows [`Channel::ALL`].
    pub fn delivery_targets(&self) -> Vec<DeliveryTarget> {
        Channel::ALL
            .iter()
            .filter_map(|channel| self.target_for(*channel))
            .collect()
    }

    /// The target for a single channel, if enabled and configured.
    pub fn target_for(&self, channel: Channel) -> Option<DeliveryTarget> {
        match channel {
            Channel::Email if self.notify_email => {
                filled(&self.email).map(|to| DeliveryTarget::Email { to: to.to_string() })
            }
            Channel::Push if self.notify_push => {
                match (filled(&self.push_user_key), filled(&self.push_api_token)) {
                    (Some(user_key), Some(api_token)) => Some(DeliveryTarget::Push {
                        user_key: user_key.to_string(),
                        api_token: api_token.to_string(),
                    }),
                    _ => None,
                }
            }
            Channel::Gateway if self.notify_gateway => {
                filled(&self.gateway_url).map(|url| DeliveryTarget::Gateway { url: url.to_string() })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fully_configured() -> Recipient {
        Recipient {
            id: 3,
            username: "dana".to_string(),
            email: Some("dana@example.com".to_string()),
            push_user_key: Some("ukey".to_string()),
            push_api_token: Some("atoken".to_string()),
            gateway_url: Some("json://hooks.example.com/notify".to_string()),
            notify_email: true,
            notify_push: true,
            notify_gateway: true,
        }
    }

    #[test]
    fn all_channels_selected_when_enabled_and_configured() {
        let channels: Vec<Channel> = fully_configured()
            .delivery_targets()
            .iter()
            .map(DeliveryTarget::channel)
            .collect();
        assert_eq!(channels, vec![Channel::Push, Channel::Email, Channel::Gateway]);
    }

    #[test]
    fn disabled_flag_excludes_channel() {
        let mut r = fully_configured();
        r.notify_email = false;
        assert!(r.target_for(Channel::Email).is_none());
        assert_eq!(r.delivery_targets().len(), 2);
    }

    #[test]
    fn missing_credential_excludes_channel() {
        let mut r = fully_configured();
        r.push_api_token = Some("   ".to_string());
        r.gateway_url = None;
        let targets = r.delivery_targets();
        assert_eq!(targets, vec![DeliveryTarget::Email { to: "dana@example.com".to_string() }]);
    }

    #[test]
    fn debug_hides_credentials() {
        let target = DeliveryTarget::Push {
            user_key: "ukey".to_string(),
            api_token: "secret-token".to_string(),
        };
        assert!(!format!("{target:?}").contains("secret-token"));
    }
}
