//! User notification profile models.

use helpdesk_core::recipient::Recipient;
use helpdesk_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The notification-related columns of a `users` row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationProfile {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub push_user_key: Option<String>,
    #[serde(skip_serializing)]
    pub push_api_token: Option<String>,
    #[serde(skip_serializing)]
    pub gateway_url: Option<String>,
    pub notify_email: bool,
    pub notify_push: bool,
    pub notify_gateway: bool,
}

/// DTO for replacing a user's notification profile.
///
/// Empty strings clear the corresponding field.
#[derive(Debug, Deserialize)]
pub struct UpdateNotificationProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub push_user_key: String,
    #[serde(default)]
    pub push_api_token: String,
    #[serde(default)]
    pub gateway_url: String,
    #[serde(default)]
    pub notify_email: bool,
    #[serde(default)]
    pub notify_push: bool,
    #[serde(default)]
    pub notify_gateway: bool,
}

impl From<NotificationProfile> for Recipient {
    fn from(p: NotificationProfile) -> Self {
        Recipient {
            id: p.id,
            username: p.username,
            email: p.email,
            push_user_key: p.push_user_key,
            push_api_token: p.push_api_token,
            gateway_url: p.gateway_url,
            notify_email: p.notify_email,
            notify_push: p.notify_push,
            notify_gateway: p.notify_gateway,
        }
    }
}
