use sqlx::SqlitePool;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Announcement;
use crate::repositories;
use crate::repositories::announcements::AnnouncementValues;
use crate::services::actor::Actor;
use crate::services::error::RecordError;
use crate::services::lifecycle::{Lifecycle, LifecycleKind};
use crate::services::students::optional_text;

#[derive(Debug, Clone, Default)]
pub(crate) struct AnnouncementDraft {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) target_class: Option<String>,
    pub(crate) priority: Option<i64>,
    pub(crate) expires_at: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct AnnouncementPatch {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) target_class: Option<String>,
    pub(crate) priority: Option<i64>,
    pub(crate) expires_at: Option<PrimitiveDateTime>,
}

fn validate_title(title: &str) -> Result<String, RecordError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(RecordError::validation("title", "title must not be empty"));
    }
    Ok(trimmed.to_string())
}

pub(crate) async fn create(
    pool: &SqlitePool,
    actor: &Actor,
    draft: AnnouncementDraft,
) -> Result<Announcement, RecordError> {
    let title = validate_title(&draft.title)?;
    let target_class = optional_text(draft.target_class);
    let values = AnnouncementValues {
        title: &title,
        content: &draft.content,
        target_class: target_class.as_deref(),
        priority: draft.priority.unwrap_or(0),
        expires_at: draft.expires_at,
    };

    let announcement = repositories::announcements::create(
        pool,
        &Uuid::new_v4().to_string(),
        &values,
        actor.user_id(),
        primitive_now_utc(),
    )
    .await
    .map_err(RecordError::from_store)?;

    tracing::info!(
        actor = %actor.label(),
        announcement_id = %announcement.id,
        priority = announcement.priority,
        "Announcement created"
    );
    Ok(announcement)
}

pub(crate) async fn update(
    pool: &SqlitePool,
    actor: &Actor,
    announcement_id: &str,
    patch: AnnouncementPatch,
) -> Result<Announcement, RecordError> {
    let current = repositories::announcements::find_by_id(pool, announcement_id)
        .await?
        .ok_or(RecordError::NotFound("announcement"))?;

    let title = match patch.title {
        Some(title) => validate_title(&title)?,
        None => current.title,
    };
    let content = patch.content.unwrap_or(current.content);
    let target_class = patch.target_class.map_or(current.target_class, |v| optional_text(Some(v)));
    let values = AnnouncementValues {
        title: &title,
        content: &content,
        target_class: target_class.as_deref(),
        priority: patch.priority.unwrap_or(current.priority),
        expires_at: patch.expires_at.or(current.expires_at),
    };

    let announcement = repositories::announcements::update(pool, announcement_id, &values)
        .await
        .map_err(RecordError::from_store)?
        .ok_or(RecordError::NotFound("announcement"))?;

    tracing::info!(
        actor = %actor.label(),
        announcement_id = %announcement_id,
        "Announcement updated"
    );
    Ok(announcement)
}

pub(crate) async fn list(
    pool: &SqlitePool,
    target_class: Option<&str>,
) -> Result<Vec<Announcement>, RecordError> {
    let target_class = target_class.map(str::trim).filter(|value| !value.is_empty());
    Ok(repositories::announcements::list_active(pool, target_class).await?)
}

pub(crate) async fn transition(
    pool: &SqlitePool,
    actor: &Actor,
    announcement_id: &str,
    target: Lifecycle,
) -> Result<(), RecordError> {
    LifecycleKind::Announcement.ensure(target)?;

    let changed = repositories::announcements::set_active(
        pool,
        announcement_id,
        target == Lifecycle::Active,
    )
    .await?;
    if !changed {
        return Err(RecordError::NotFound("announcement"));
    }

    tracing::info!(
        actor = %actor.label(),
        announcement_id = %announcement_id,
        lifecycle = target.as_str(),
        "Announcement lifecycle changed"
    );
    Ok(())
}
