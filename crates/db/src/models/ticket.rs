//! Ticket entity model.

use helpdesk_core::ticket::TicketSnapshot;
use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub queue_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub created_by: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for opening a ticket.
#[derive(Debug, Deserialize)]
pub struct CreateTicket {
    pub queue_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub created_by: Option<DbId>,
    pub assigned_to: Option<DbId>,
}

impl From<Ticket> for TicketSnapshot {
    fn from(t: Ticket) -> Self {
        TicketSnapshot {
            id: t.id,
            title: t.title,
            status: t.status,
            priority: t.priority,
            assigned_to: t.assigned_to,
        }
    }
}
