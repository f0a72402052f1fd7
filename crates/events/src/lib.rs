//! Helpdesk notification dispatch core.
//!
//! When a ticket is assigned, changes status or priority, or receives a
//! comment, the assignee is told through every channel they enabled. The
//! building blocks are:
//!
//! - [`NotificationDispatcher`]: resolves the assignee, renders the message
//!   and schedules one send per enabled channel. Never fails its caller.
//! - [`BackgroundRunner`]: bounded worker pool that runs sends detached from
//!   the request, inheriting the caller's tracing span.
//! - [`delivery`]: the three channel senders (mail, push, gateway).
//! - [`self_test`]: synchronous mail relay check for administrators.
//! - [`ports`]: the ticket directory and settings store abstractions, with
//!   PostgreSQL adapters in [`postgres`].

pub mod delivery;
pub mod dispatcher;
pub mod ports;
pub mod postgres;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_support;

pub use delivery::gateway::GatewaySender;
pub use delivery::mail::MailSender;
pub use delivery::push::PushSender;
pub use delivery::{ChannelSenders, Notifier};
pub use dispatcher::NotificationDispatcher;
pub use ports::{DirectoryError, SettingsError, SettingsSource, TicketDirectory};
pub use postgres::{PgDirectory, PgSettings};
pub use runner::{BackgroundRunner, RunnerConfig, RunnerHandle, RunnerStatus};
pub use self_test::{test_mail_connection, MailTestError};
