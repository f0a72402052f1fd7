//! Helpdesk domain types and pure notification logic.
//!
//! Nothing in this crate performs I/O. The database layer (`helpdesk-db`),
//! the notification core (`helpdesk-events`) and the HTTP surface
//! (`helpdesk-api`) all build on these types.

pub mod channels;
pub mod error;
pub mod event;
pub mod mail_settings;
pub mod recipient;
pub mod template;
pub mod ticket;
pub mod types;
pub mod validation;
