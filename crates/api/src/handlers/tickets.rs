//! Handlers for the `/tickets` resource.
//!
//! Every mutation commits first and then hands the event to the
//! notification dispatcher. The dispatcher never fails, so the response
//! reflects the mutation alone.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::event::{EventType, NotificationEvent};
use helpdesk_core::ticket::{TicketPriority, TicketStatus};
use helpdesk_core::types::DbId;
use helpdesk_db::models::comment::{Comment, CreateComment};
use helpdesk_db::models::ticket::{CreateTicket, Ticket};
use helpdesk_db::repositories::{CommentRepo, TicketRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /tickets/{id}/assign`. `assigned_to: null` unassigns.
#[derive(Debug, Deserialize)]
pub struct AssignTicket {
    pub assigned_to: Option<DbId>,
    /// The user performing the change, if any.
    pub actor_id: Option<DbId>,
}

/// Body for `PUT /tickets/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatus {
    pub status: String,
    pub actor_id: Option<DbId>,
}

/// Body for `PUT /tickets/{id}/priority`.
#[derive(Debug, Deserialize)]
pub struct UpdatePriority {
    pub priority: String,
    pub actor_id: Option<DbId>,
}

/// Parse a submitted status or priority, ignoring case and surrounding
/// whitespace.
fn parse_choice<T: FromStr<Err = CoreError>>(raw: &str) -> Result<T, CoreError> {
    T::from_str(&raw.trim().to_lowercase())
}

fn ticket_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Ticket",
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/tickets
///
/// Open a ticket. A ticket created with an assignee notifies them.
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(mut input): Json<CreateTicket>,
) -> AppResult<(StatusCode, Json<DataResponse<Ticket>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title must not be empty".to_string(),
        )));
    }
    if let Some(priority) = input.priority.as_mut() {
        *priority = parse_choice::<TicketPriority>(priority)?.as_str().to_string();
    }

    let ticket = TicketRepo::create(&state.pool, &input).await?;
    tracing::info!(ticket_id = ticket.id, assigned_to = ?ticket.assigned_to, "Ticket created");

    if ticket.assigned_to.is_some() {
        state
            .dispatcher
            .dispatch(&NotificationEvent::new(
                ticket.id,
                EventType::AssignedOnCreation,
                input.created_by,
            ))
            .await;
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// GET /api/v1/tickets/{id}
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket = TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ticket_not_found(id))?;
    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/tickets/{id}/assign
///
/// Set or clear the assignee. Setting one notifies them.
pub async fn assign_ticket(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignTicket>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket = TicketRepo::assign(&state.pool, id, input.assigned_to)
        .await?
        .ok_or_else(|| ticket_not_found(id))?;

    if ticket.assigned_to.is_some() {
        state
            .dispatcher
            .dispatch(&NotificationEvent::new(id, EventType::Assigned, input.actor_id))
            .await;
    }

    Ok(Json(DataResponse { data: ticket }))
}

/// PUT /api/v1/tickets/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatus>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let status: TicketStatus = parse_choice(&input.status)?;

    let ticket = TicketRepo::update_status(&state.pool, id, status.as_str())
        .await?
        .ok_or_else(|| ticket_not_found(id))?;

    state
        .dispatcher
        .dispatch(&NotificationEvent::new(id, EventType::StatusUpdate, input.actor_id))
        .await;

    Ok(Json(DataResponse { data: ticket }))
}

/// PUT /api/v1/tickets/{id}/priority
pub async fn update_priority(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePriority>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let priority: TicketPriority = parse_choice(&input.priority)?;

    let ticket = TicketRepo::update_priority(&state.pool, id, priority.as_str())
        .await?
        .ok_or_else(|| ticket_not_found(id))?;

    state
        .dispatcher
        .dispatch(&NotificationEvent::new(id, EventType::PriorityUpdate, input.actor_id))
        .await;

    Ok(Json(DataResponse { data: ticket }))
}

/// GET /api/v1/tickets/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Comment>>>> {
    let comments = CommentRepo::list_for_ticket(&state.pool, id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/tickets/{id}/comments
///
/// Add a comment. The commenter is the triggering user, so an assignee
/// commenting on their own ticket is not notified.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    if input.content.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "content must not be empty".to_string(),
        )));
    }

    TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ticket_not_found(id))?;

    let comment = CommentRepo::create(&state.pool, id, &input).await?;

    state
        .dispatcher
        .dispatch(&NotificationEvent::new(id, EventType::NewComment, input.user_id))
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn submitted_choices_ignore_case() {
        assert_eq!(parse_choice::<TicketStatus>("Closed").unwrap(), TicketStatus::Closed);
        assert_eq!(
            parse_choice::<TicketStatus>(" In Progress ").unwrap(),
            TicketStatus::InProgress
        );
        assert_eq!(parse_choice::<TicketPriority>("HIGH").unwrap(), TicketPriority::High);
    }

    #[test]
    fn unknown_choice_is_still_rejected() {
        assert_matches!(
            parse_choice::<TicketPriority>("Urgent"),
            Err(CoreError::Validation(_))
        );
    }
}
