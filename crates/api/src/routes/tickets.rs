//! Route definitions for the `/tickets` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// POST   /                  -> create_ticket
/// GET    /{id}              -> get_ticket
/// POST   /{id}/assign       -> assign_ticket
/// PUT    /{id}/status       -> update_status
/// PUT    /{id}/priority     -> update_priority
/// GET    /{id}/comments     -> list_comments
/// POST   /{id}/comments     -> add_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tickets::create_ticket))
        .route("/{id}", get(tickets::get_ticket))
        .route("/{id}/assign", post(tickets::assign_ticket))
        .route("/{id}/status", put(tickets::update_status))
        .route("/{id}/priority", put(tickets::update_priority))
        .route(
            "/{id}/comments",
            get(tickets::list_comments).post(tickets::add_comment),
        )
}
