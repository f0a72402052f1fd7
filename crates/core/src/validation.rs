//! Validation of user-editable notification and mail settings.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::mail_settings::parse_port;

/// Maximum length of an email address (RFC 5321 path limit).
const MAX_EMAIL_LEN: usize = 254;

/// Maximum length of a gateway URL.
const MAX_GATEWAY_URL_LEN: usize = 2048;

/// Validate an optional email address field.
///
/// Blank is accepted (the field is optional); anything else must be a
/// syntactically valid address.
pub fn validate_optional_email(field: &str, value: &str) -> Result<(), CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    if value.len() > MAX_EMAIL_LEN || !value.validate_email() {
        return Err(CoreError::Validation(format!(
            "{field}: invalid email address format"
        )));
    }
    Ok(())
}

/// Validate a port entered on the mail settings form.
///
/// Blank is accepted and means the default port.
pub fn validate_port(value: &str) -> Result<(), CoreError> {
    parse_port(Some(value)).map(|_| ())
}

/// Validate a gateway URL: blank, or `scheme://rest` within length limits.
///
/// Scheme support is checked at send time by the gateway sender.
pub fn validate_gateway_url(value: &str) -> Result<(), CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    if value.len() > MAX_GATEWAY_URL_LEN {
        return Err(CoreError::Validation(format!(
            "Gateway URL must not exceed {MAX_GATEWAY_URL_LEN} characters"
        )));
    }
    match value.split_once("://") {
        Some((scheme, rest))
            if !scheme.is_empty()
                && !rest.is_empty()
                && scheme.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            Ok(())
        }
        _ => Err(CoreError::Validation(
            "Gateway URL must look like 'scheme://…'".to_string(),
        )),
    }
}
