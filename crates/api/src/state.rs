use std::sync::Arc;

use helpdesk_events::{NotificationDispatcher, SettingsSource};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: helpdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Routes ticket events to assignees.
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Settings store read by the mail connection test.
    pub settings: Arc<dyn SettingsSource>,
}
