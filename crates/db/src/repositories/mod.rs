//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Workflow transitions are
//! single conditional UPDATE statements; the ones that also synchronize
//! the sample status run inside a transaction.

pub mod client_repo;
pub mod echantillon_repo;
pub mod event_repo;
pub mod notification_repo;
pub mod user_repo;
pub mod workflow_repo;

pub use client_repo::ClientRepo;
pub use echantillon_repo::EchantillonRepo;
pub use event_repo::EventRepo;
pub use notification_repo::NotificationRepo;
pub use user_repo::UserRepo;
pub use workflow_repo::WorkflowRepo;
