//! Notification fan-out for workflow hand-offs.
//!
//! Every transition notifies the users holding the role that must act
//! next: info on submission and resubmission, success on a forward
//! hand-off, warning on rejection. Fan-out happens after the transition
//! committed and is best-effort -- callers log a failure instead of
//! failing the already-applied transition.

use sqlx::PgPool;

use geolab_core::notification::validate_type;
use geolab_core::types::DbId;
use geolab_db::models::notification::CreateNotification;
use geolab_db::repositories::{NotificationRepo, UserRepo};

use crate::error::AppError;

/// Originating module recorded on workflow notifications.
const MODULE_WORKFLOW: &str = "workflow";

/// Create one notification per active holder of `role`.
///
/// Returns how many users were notified.
pub async fn notifier_role(
    pool: &PgPool,
    role: &str,
    type_notification: &str,
    title: &str,
    message: &str,
    echantillon_id: Option<DbId>,
) -> Result<usize, AppError> {
    validate_type(type_notification)?;
    let destinataires = UserRepo::find_active_by_role(pool, role).await?;
    for user in &destinataires {
        let input = CreateNotification {
            user_id: user.id,
            r#type: type_notification.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            module: MODULE_WORKFLOW.to_string(),
            action_required: true,
            echantillon_id,
        };
        NotificationRepo::create(pool, &input).await?;
    }
    Ok(destinataires.len())
}

/// Notify one specific user (e.g. the workflow's author on terminal
/// dispatch). No action is expected from the recipient.
pub async fn notifier_user(
    pool: &PgPool,
    user_id: DbId,
    type_notification: &str,
    title: &str,
    message: &str,
    echantillon_id: Option<DbId>,
) -> Result<(), AppError> {
    validate_type(type_notification)?;
    let input = CreateNotification {
        user_id,
        r#type: type_notification.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        module: MODULE_WORKFLOW.to_string(),
        action_required: false,
        echantillon_id,
    };
    NotificationRepo::create(pool, &input).await?;
    Ok(())
}
