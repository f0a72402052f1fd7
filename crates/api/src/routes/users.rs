//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /{id}/notifications   -> get_notification_profile
/// PUT    /{id}/notifications   -> update_notification_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}/notifications",
        get(users::get_notification_profile).put(users::update_notification_profile),
    )
}
