//! Event bus and domain event persistence for the laboratory workflow
//! service.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] — the canonical domain event envelope.
//! - [`EventPersistence`] — background service that durably appends every
//!   event to the `events` table.
//! - [`names`] — the dot-separated event name vocabulary.

pub mod bus;
pub mod names;
pub mod persistence;

pub use bus::{DomainEvent, EventBus};
pub use persistence::EventPersistence;
