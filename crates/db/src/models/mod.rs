//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row and, where the table is writable from the API, a `Deserialize` DTO.

pub mod comment;
pub mod ticket;
pub mod user;
