//! Read-side abstractions the notification core depends on.
//!
//! The dispatcher and the mail sender only ever read tickets, user profiles
//! and settings. These traits keep them independent of the database so the
//! same code runs against PostgreSQL in production and in-memory fakes in
//! tests.

use std::collections::HashMap;

use async_trait::async_trait;
use helpdesk_core::recipient::Recipient;
use helpdesk_core::ticket::TicketSnapshot;
use helpdesk_core::types::DbId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to look up a ticket or user.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Directory query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Failure to read the settings store.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Settings unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Resolves tickets and their assignees.
#[async_trait]
pub trait TicketDirectory: Send + Sync {
    /// Load a ticket, or `None` if it does not exist.
    async fn ticket(&self, ticket_id: DbId) -> Result<Option<TicketSnapshot>, DirectoryError>;

    /// Load a user's notification profile, or `None` if the user does not
    /// exist.
    async fn recipient(&self, user_id: DbId) -> Result<Option<Recipient>, DirectoryError>;
}

/// Key/value settings store. Implementations must not cache: every call
/// reflects the current stored values.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Load the given keys. Keys with no stored value are absent.
    async fn load(&self, keys: &[&str]) -> Result<HashMap<String, String>, SettingsError>;
}
