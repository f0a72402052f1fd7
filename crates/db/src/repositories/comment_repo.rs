//! Repository for the `comments` table.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};

/// Column list for `comments` queries.
const COLUMNS: &str = "id, ticket_id, user_id, content, created_at";

/// Provides insert and listing for ticket comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Add a comment to a ticket, returning the stored row.
    pub async fn create(
        pool: &PgPool,
        ticket_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (ticket_id, user_id, content) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(ticket_id)
            .bind(input.user_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// List a ticket's comments, oldest first.
    pub async fn list_for_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments \
             WHERE ticket_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }
}
