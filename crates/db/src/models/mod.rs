//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - `Deserialize` request types for the operations that mutate the entity

pub mod client;
pub mod echantillon;
pub mod event;
pub mod notification;
pub mod user;
pub mod workflow;
