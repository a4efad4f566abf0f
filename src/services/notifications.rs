use sqlx::SqlitePool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Notification;
use crate::db::types::NotificationType;
use crate::repositories;
use crate::repositories::notifications::CreateNotification;
use crate::services::actor::Actor;
use crate::services::error::RecordError;
use crate::services::students::optional_text;

#[derive(Debug, Clone)]
pub(crate) struct NotificationDraft {
    pub(crate) user_id: String,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) notification_type: NotificationType,
    pub(crate) link: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct Inbox {
    pub(crate) notifications: Vec<Notification>,
    pub(crate) unread_count: i64,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    actor: &Actor,
    draft: NotificationDraft,
) -> Result<Notification, RecordError> {
    if draft.title.trim().is_empty() {
        return Err(RecordError::validation("title", "title must not be empty"));
    }
    if !repositories::users::exists(pool, &draft.user_id).await? {
        return Err(RecordError::NotFound("user"));
    }

    let link = optional_text(draft.link);
    let notification = repositories::notifications::create(
        pool,
        CreateNotification {
            id: &Uuid::new_v4().to_string(),
            user_id: &draft.user_id,
            title: draft.title.trim(),
            message: &draft.message,
            notification_type: draft.notification_type,
            link: link.as_deref(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(RecordError::from_store)?;

    tracing::info!(
        actor = %actor.label(),
        notification_id = %notification.id,
        user_id = %notification.user_id,
        "Notification created"
    );
    Ok(notification)
}

pub(crate) async fn inbox(pool: &SqlitePool, user_id: &str) -> Result<Inbox, RecordError> {
    let notifications = repositories::notifications::list_for_user(pool, user_id).await?;
    let unread_count = repositories::notifications::count_unread(pool, user_id).await?;
    Ok(Inbox { notifications, unread_count })
}

/// A notification owned by someone else is reported as missing.
pub(crate) async fn mark_read(
    pool: &SqlitePool,
    user_id: &str,
    notification_id: &str,
) -> Result<Notification, RecordError> {
    repositories::notifications::mark_read(pool, notification_id, user_id)
        .await?
        .ok_or(RecordError::NotFound("notification"))
}

pub(crate) async fn mark_all_read(pool: &SqlitePool, user_id: &str) -> Result<u64, RecordError> {
    let changed = repositories::notifications::mark_all_read(pool, user_id).await?;
    tracing::debug!(user_id = %user_id, changed, "Notifications marked read");
    Ok(changed)
}
