//! Ticket events that produce notifications.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Classification of a ticket mutation. Each variant maps to one fixed
/// subject/body template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// The ticket was (re)assigned to a user.
    Assigned,
    /// The ticket was created already assigned to a user.
    AssignedOnCreation,
    StatusUpdate,
    PriorityUpdate,
    NewComment,
}

impl EventType {
    /// Parse a wire name. Unknown names yield `None`; callers treat that as
    /// a no-op rather than an error.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "assigned" => Some(EventType::Assigned),
            "assigned_on_creation" => Some(EventType::AssignedOnCreation),
            "status_update" => Some(EventType::StatusUpdate),
            "priority_update" => Some(EventType::PriorityUpdate),
            "new_comment" => Some(EventType::NewComment),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Assigned => "assigned",
            EventType::AssignedOnCreation => "assigned_on_creation",
            EventType::StatusUpdate => "status_update",
            EventType::PriorityUpdate => "priority_update",
            EventType::NewComment => "new_comment",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transient notification request. Never persisted; consumed by the
/// dispatcher within the call that created it.
///
/// `event_type` is kept as the raw name so an unrecognised value can still
/// be reported in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub ticket_id: DbId,
    pub event_type: String,
    /// The user whose action caused the event, or `None` for system actions.
    pub triggering_user_id: Option<DbId>,
}

impl NotificationEvent {
    pub fn new(ticket_id: DbId, event_type: EventType, triggering_user_id: Option<DbId>) -> Self {
        Self {
            ticket_id,
            event_type: event_type.as_str().to_string(),
            triggering_user_id,
        }
    }
}
