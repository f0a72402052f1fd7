//! Ticket comment models.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub ticket_id: DbId,
    pub user_id: Option<DbId>,
    pub content: String,
    pub created_at: Timestamp,
}

/// DTO for adding a comment to a ticket.
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub user_id: Option<DbId>,
    pub content: String,
}
