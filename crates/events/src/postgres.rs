//! PostgreSQL-backed implementations of the notification ports.

use std::collections::HashMap;

use async_trait::async_trait;
use helpdesk_core::recipient::Recipient;
use helpdesk_core::ticket::TicketSnapshot;
use helpdesk_core::types::DbId;
use helpdesk_db::repositories::{SettingRepo, TicketRepo, UserRepo};
use helpdesk_db::DbPool;

use crate::ports::{DirectoryError, SettingsError, SettingsSource, TicketDirectory};

/// Reads tickets and user profiles from the `tickets` and `users` tables.
#[derive(Clone)]
pub struct PgDirectory {
    pool: DbPool,
}

impl PgDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketDirectory for PgDirectory {
    async fn ticket(&self, ticket_id: DbId) -> Result<Option<TicketSnapshot>, DirectoryError> {
        let ticket = TicketRepo::find_by_id(&self.pool, ticket_id).await?;
        Ok(ticket.map(TicketSnapshot::from))
    }

    async fn recipient(&self, user_id: DbId) -> Result<Option<Recipient>, DirectoryError> {
        let profile = UserRepo::find_notification_profile(&self.pool, user_id).await?;
        Ok(profile.map(Recipient::from))
    }
}

/// Reads the `settings` table on every call.
#[derive(Clone)]
pub struct PgSettings {
    pool: DbPool,
}

impl PgSettings {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsSource for PgSettings {
    async fn load(&self, keys: &[&str]) -> Result<HashMap<String, String>, SettingsError> {
        Ok(SettingRepo::load_keys(&self.pool, keys).await?)
    }
}
