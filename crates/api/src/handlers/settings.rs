//! Handlers for the mail relay settings used by email notifications.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use helpdesk_core::mail_settings::{
    KEY_SMTP_FROM_EMAIL, KEY_SMTP_PASSWORD, KEY_SMTP_PORT, KEY_SMTP_SERVER, KEY_SMTP_USERNAME,
    KEY_SMTP_USE_TLS, MAIL_KEYS,
};
use helpdesk_core::validation::{validate_optional_email, validate_port};
use helpdesk_db::repositories::SettingRepo;
use helpdesk_events::test_mail_connection;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Mail settings as shown to an administrator. The password is never
/// returned; only whether one is stored.
#[derive(Debug, Serialize)]
pub struct MailSettingsView {
    pub smtp_server: String,
    pub smtp_port: String,
    pub smtp_from_email: String,
    pub smtp_username: String,
    pub smtp_password_set: bool,
    pub smtp_use_tls: bool,
}

impl MailSettingsView {
    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).cloned().unwrap_or_default();
        Self {
            smtp_server: get(KEY_SMTP_SERVER),
            smtp_port: get(KEY_SMTP_PORT),
            smtp_from_email: get(KEY_SMTP_FROM_EMAIL),
            smtp_username: get(KEY_SMTP_USERNAME),
            smtp_password_set: map.get(KEY_SMTP_PASSWORD).is_some_and(|p| !p.is_empty()),
            smtp_use_tls: map.get(KEY_SMTP_USE_TLS).map(|v| v.trim()) == Some("1"),
        }
    }
}

/// Body for `PUT /admin/settings/mail`.
///
/// An empty `smtp_password` keeps the stored password.
#[derive(Debug, Deserialize)]
pub struct UpdateMailSettings {
    #[serde(default)]
    pub smtp_server: String,
    #[serde(default)]
    pub smtp_port: String,
    #[serde(default)]
    pub smtp_from_email: String,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default)]
    pub smtp_use_tls: bool,
}

impl UpdateMailSettings {
    /// The rows to write, in key order.
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (KEY_SMTP_SERVER, self.smtp_server.trim().to_string()),
            (KEY_SMTP_PORT, self.smtp_port.trim().to_string()),
            (KEY_SMTP_FROM_EMAIL, self.smtp_from_email.trim().to_string()),
            (KEY_SMTP_USERNAME, self.smtp_username.trim().to_string()),
            (
                KEY_SMTP_USE_TLS,
                if self.smtp_use_tls { "1" } else { "0" }.to_string(),
            ),
        ];
        if !self.smtp_password.is_empty() {
            pairs.push((KEY_SMTP_PASSWORD, self.smtp_password.clone()));
        }
        pairs
    }
}

/// Outcome of a successful relay check.
#[derive(Debug, Serialize)]
pub struct MailTestResult {
    pub success: bool,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/settings/mail
pub async fn get_mail_settings(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MailSettingsView>>> {
    let map = SettingRepo::load_keys(&state.pool, &MAIL_KEYS).await?;
    Ok(Json(DataResponse {
        data: MailSettingsView::from_map(&map),
    }))
}

/// PUT /api/v1/admin/settings/mail
///
/// Validates the port and the sender address before writing anything.
pub async fn update_mail_settings(
    State(state): State<AppState>,
    Json(input): Json<UpdateMailSettings>,
) -> AppResult<Json<DataResponse<MailSettingsView>>> {
    validate_port(&input.smtp_port)?;
    validate_optional_email("smtp_from_email", &input.smtp_from_email)?;

    SettingRepo::upsert_many(&state.pool, &input.to_pairs()).await?;
    tracing::info!(
        smtp_server = %input.smtp_server,
        password_changed = !input.smtp_password.is_empty(),
        "Mail settings updated"
    );

    let map = SettingRepo::load_keys(&state.pool, &MAIL_KEYS).await?;
    Ok(Json(DataResponse {
        data: MailSettingsView::from_map(&map),
    }))
}

/// POST /api/v1/admin/settings/mail/test
///
/// Check the stored relay settings. Failures come back as errors with a
/// message suitable for display.
pub async fn test_mail_settings(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MailTestResult>>> {
    test_mail_connection(state.settings.as_ref()).await?;
    Ok(Json(DataResponse {
        data: MailTestResult {
            success: true,
            message: "SMTP connection successful",
        },
    }))
}
