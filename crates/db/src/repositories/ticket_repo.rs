//! Repository for the `tickets` table.
//!
//! The mutating methods are the ones whose callers raise notification
//! events; each returns the updated row, or `None` when the ticket does not
//! exist.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::ticket::{CreateTicket, Ticket};

/// Column list for `tickets` queries.
const COLUMNS: &str = "id, queue_id, title, description, status, priority, \
    created_by, assigned_to, created_at, updated_at";

/// Provides reads and the notification-relevant mutations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Find a ticket by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Open a new ticket. Priority defaults to `medium`.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (queue_id, title, description, priority, created_by, assigned_to) \
             VALUES ($1, $2, $3, COALESCE($4, 'medium'), $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(input.queue_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(input.created_by)
            .bind(input.assigned_to)
            .fetch_one(pool)
            .await
    }

    /// Set or clear the assignee.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        assignee: Option<DbId>,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET assigned_to = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(assignee)
            .fetch_optional(pool)
            .await
    }

    /// Change the status. The value must already be validated.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET status = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Change the priority. The value must already be validated.
    pub async fn update_priority(
        pool: &PgPool,
        id: DbId,
        priority: &str,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET priority = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(priority)
            .fetch_optional(pool)
            .await
    }
}
