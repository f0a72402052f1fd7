//! Repository for the notification columns of the `users` table.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{NotificationProfile, UpdateNotificationProfile};

/// Column list for notification profile queries.
const PROFILE_COLUMNS: &str = "id, username, email, push_user_key, push_api_token, \
    gateway_url, notify_email, notify_push, notify_gateway";

/// Provides access to users' notification profiles.
pub struct UserRepo;

impl UserRepo {
    /// Create a user with notifications disabled, returning the generated ID.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        email: Option<&str>,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar("INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id")
            .bind(username)
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Load a user's contact fields and channel flags.
    pub async fn find_notification_profile(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<NotificationProfile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, NotificationProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's notification profile. Blank strings are stored as
    /// NULL.
    pub async fn update_notification_profile(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateNotificationProfile,
    ) -> Result<Option<NotificationProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                email = NULLIF(TRIM($2), ''), \
                push_user_key = NULLIF(TRIM($3), ''), \
                push_api_token = NULLIF(TRIM($4), ''), \
                gateway_url = NULLIF(TRIM($5), ''), \
                notify_email = $6, \
                notify_push = $7, \
                notify_gateway = $8, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, NotificationProfile>(&query)
            .bind(user_id)
            .bind(&input.email)
            .bind(&input.push_user_key)
            .bind(&input.push_api_token)
            .bind(&input.gateway_url)
            .bind(input.notify_email)
            .bind(input.notify_push)
            .bind(input.notify_gateway)
            .fetch_optional(pool)
            .await
    }
}
