//! Domain core for the geolab report validation service.
//!
//! Pure, database-free building blocks shared by the `geolab-db` and
//! `geolab-api` crates:
//!
//! - [`workflow`] — the report validation state machine (stages, forward
//!   progression, rejection routing, precondition checks).
//! - [`echantillon`] — sample lifecycle statuses and laboratory code
//!   formats.
//! - [`roles`] — well-known role names and the stage-to-role mapping.
//! - [`notification`] — notification kind constants.
//! - [`error`] — the [`CoreError`](error::CoreError) taxonomy.
//! - [`types`] — id and timestamp aliases.

pub mod echantillon;
pub mod error;
pub mod notification;
pub mod roles;
pub mod types;
pub mod workflow;
