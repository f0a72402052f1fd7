pub mod health;
pub mod settings;
pub mod tickets;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tickets                                 open a ticket (POST)
/// /tickets/{id}                            get
/// /tickets/{id}/assign                     set or clear assignee (POST)
/// /tickets/{id}/status                     change status (PUT)
/// /tickets/{id}/priority                   change priority (PUT)
/// /tickets/{id}/comments                   list, add
///
/// /users/{id}/notifications                get, replace notification profile
///
/// /admin/settings/mail                     get, update relay settings
/// /admin/settings/mail/test                check the relay (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tickets", tickets::router())
        .nest("/users", users::router())
        .nest("/admin/settings", settings::router())
}
