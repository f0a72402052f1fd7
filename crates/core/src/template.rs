//! Fixed subject/body templates for ticket notifications.

use crate::event::EventType;
use crate::ticket::TicketSnapshot;

/// A channel-agnostic notification: a subject (used as title by push and
/// gateway channels) and a plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub subject: String,
    pub body: String,
}

impl OutboundMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Render the message for an event on a ticket.
///
/// When `public_base_url` is set a `View:` line linking to the ticket is
/// appended to the body.
pub fn render(
    event_type: EventType,
    ticket: &TicketSnapshot,
    public_base_url: Option<&str>,
) -> OutboundMessage {
    let id = ticket.id;
    let title = &ticket.title;

    let (subject, mut body) = match event_type {
        EventType::Assigned | EventType::AssignedOnCreation => (
            format!("Ticket #{id} Has Been Assigned To You"),
            format!("You have been assigned to ticket #{id}: '{title}'."),
        ),
        EventType::StatusUpdate => (
            format!("Status Update on Ticket #{id}"),
            format!(
                "The status of ticket #{id} ('{title}') has been updated to '{}'.",
                ticket.status
            ),
        ),
        EventType::PriorityUpdate => (
            format!("Priority Update on Ticket #{id}"),
            format!(
                "The priority of ticket #{id} ('{title}') has been updated to '{}'.",
                ticket.priority
            ),
        ),
        EventType::NewComment => (
            format!("New Comment on Ticket #{id}"),
            format!("A new comment has been added to ticket #{id} ('{title}')."),
        ),
    };

    if let Some(url) = ticket_url(public_base_url, id) {
        body.push_str("\nView: ");
        body.push_str(&url);
    }

    OutboundMessage { subject, body }
}

fn ticket_url(public_base_url: Option<&str>, ticket_id: i64) -> Option<String> {
    let base = public_base_url?.trim().trim_end_matches('/');
    if base.is_empty() {
        return None;
    }
    Some(format!("{base}/tickets/{ticket_id}"))
}

// ---------------------------------------------------------------------------
// Preference confirmation messages
// ---------------------------------------------------------------------------

/// Sent by email after a user saves their notification preferences.
pub fn email_settings_confirmation() -> OutboundMessage {
    OutboundMessage::new(
        "Notification Settings Updated",
        "Your email notification settings have been updated.",
    )
}

/// Sent by push after a user saves their notification preferences.
pub fn push_settings_confirmation() -> OutboundMessage {
    OutboundMessage::new("Push Test", "Your push notification settings have been updated.")
}

/// Sent through the gateway after a user saves their notification
/// preferences.
pub fn gateway_settings_confirmation() -> OutboundMessage {
    OutboundMessage::new(
        "Gateway Test",
        "Your gateway notification settings have been updated.",
    )
}
