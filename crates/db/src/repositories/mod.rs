//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod setting_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use setting_repo::SettingRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
