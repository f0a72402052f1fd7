//! Route definitions for `/admin/settings`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/admin/settings`.
///
/// ```text
/// GET    /mail        -> get_mail_settings
/// PUT    /mail        -> update_mail_settings
/// POST   /mail/test   -> test_mail_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/mail",
            get(settings::get_mail_settings).put(settings::update_mail_settings),
        )
        .route("/mail/test", post(settings::test_mail_settings))
}
