//! Typed snapshot of the mail relay settings stored in the `settings`
//! key/value table.

use std::collections::HashMap;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Keys and defaults
// ---------------------------------------------------------------------------

pub const KEY_SMTP_SERVER: &str = "smtp_server";
pub const KEY_SMTP_PORT: &str = "smtp_port";
pub const KEY_SMTP_FROM_EMAIL: &str = "smtp_from_email";
pub const KEY_SMTP_USERNAME: &str = "smtp_username";
pub const KEY_SMTP_PASSWORD: &str = "smtp_password";
pub const KEY_SMTP_USE_TLS: &str = "smtp_use_tls";

/// Every key this module reads, in display order.
pub const MAIL_KEYS: [&str; 6] = [
    KEY_SMTP_SERVER,
    KEY_SMTP_PORT,
    KEY_SMTP_FROM_EMAIL,
    KEY_SMTP_USERNAME,
    KEY_SMTP_PASSWORD,
    KEY_SMTP_USE_TLS,
];

/// Port used when `smtp_port` is absent (or unparseable on the send path).
pub const DEFAULT_SMTP_PORT: u16 = 587;

// ---------------------------------------------------------------------------
// MailSettings
// ---------------------------------------------------------------------------

/// Mail relay configuration, fetched once per send.
#[derive(Clone, PartialEq, Eq)]
pub struct MailSettings {
    /// Relay hostname. `None` when unset or blank.
    pub host: Option<String>,
    pub port: u16,
    /// RFC 5322 "From" address. `None` when unset or blank.
    pub from_address: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Upgrade the connection with STARTTLS (`smtp_use_tls = "1"`).
    pub use_tls: bool,
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("from_address", &self.from_address)
            .field("username", &self.username)
            .field("password_set", &self.password.is_some())
            .field("use_tls", &self.use_tls)
            .finish()
    }
}

fn non_blank(map: &HashMap<String, String>, key: &str) -> Option<String> {
    map.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a stored port value. Absent or blank means [`DEFAULT_SMTP_PORT`].
pub fn parse_port(raw: Option<&str>) -> Result<u16, CoreError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_SMTP_PORT),
        Some(value) => match value.parse::<u16>() {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(CoreError::Validation(format!(
                "Invalid SMTP port: '{value}'. Must be a number between 1 and 65535."
            ))),
        },
    }
}

impl MailSettings {
    /// Build the snapshot, rejecting an invalid port.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, CoreError> {
        let port = parse_port(map.get(KEY_SMTP_PORT).map(String::as_str))?;
        Ok(Self::with_port(map, port))
    }

    /// Build the snapshot, falling back to [`DEFAULT_SMTP_PORT`] when the
    /// stored port is invalid. The rejected value is returned alongside so
    /// the caller can report it.
    pub fn from_map_lenient(map: &HashMap<String, String>) -> (Self, Option<CoreError>) {
        match parse_port(map.get(KEY_SMTP_PORT).map(String::as_str)) {
            Ok(port) => (Self::with_port(map, port), None),
            Err(e) => (Self::with_port(map, DEFAULT_SMTP_PORT), Some(e)),
        }
    }

    fn with_port(map: &HashMap<String, String>, port: u16) -> Self {
        Self {
            host: non_blank(map, KEY_SMTP_SERVER),
            port,
            from_address: non_blank(map, KEY_SMTP_FROM_EMAIL),
            username: non_blank(map, KEY_SMTP_USERNAME),
            // Passwords may legitimately contain surrounding spaces.
            password: map.get(KEY_SMTP_PASSWORD).filter(|v| !v.is_empty()).cloned(),
            use_tls: map.get(KEY_SMTP_USE_TLS).map(|v| v.trim()) == Some("1"),
        }
    }

    /// Username and password, only when both are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
