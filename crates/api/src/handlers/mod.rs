pub mod settings;
pub mod tickets;
pub mod users;
