//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers validate preconditions via `geolab_core`, delegate to the
//! corresponding repository in `geolab_db`, map errors via [`AppError`],
//! and publish domain events on the bus.
//!
//! [`AppError`]: crate::error::AppError

pub mod admin;
pub mod auth;
pub mod client;
pub mod echantillon;
pub mod notification;
pub mod workflow;
