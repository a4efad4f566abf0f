use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use validator::Validate;

use crate::core::time::{
    deserialize_option_datetime_flexible, format_primitive, primitive_now_utc,
};
use crate::db::models::Announcement;
use crate::services::announcements::{AnnouncementDraft, AnnouncementPatch};
use crate::services::metrics::is_expired;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AnnouncementCreate {
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) content: String,
    #[serde(default, alias = "targetClass")]
    pub(crate) target_class: Option<String>,
    #[serde(default)]
    pub(crate) priority: Option<i64>,
    #[serde(
        default,
        alias = "expiresAt",
        deserialize_with = "deserialize_option_datetime_flexible"
    )]
    pub(crate) expires_at: Option<PrimitiveDateTime>,
}

impl AnnouncementCreate {
    pub(crate) fn into_draft(self) -> AnnouncementDraft {
        AnnouncementDraft {
            title: self.title,
            content: self.content,
            target_class: self.target_class,
            priority: self.priority,
            expires_at: self.expires_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AnnouncementUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) content: Option<String>,
    #[serde(default, alias = "targetClass")]
    pub(crate) target_class: Option<String>,
    #[serde(default)]
    pub(crate) priority: Option<i64>,
    #[serde(
        default,
        alias = "expiresAt",
        deserialize_with = "deserialize_option_datetime_flexible"
    )]
    pub(crate) expires_at: Option<PrimitiveDateTime>,
}

impl AnnouncementUpdate {
    pub(crate) fn into_patch(self) -> AnnouncementPatch {
        AnnouncementPatch {
            title: self.title,
            content: self.content,
            target_class: self.target_class,
            priority: self.priority,
            expires_at: self.expires_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnnouncementListQuery {
    #[serde(default)]
    pub(crate) target_class: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnnouncementResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) created_by: Option<String>,
    pub(crate) target_class: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) priority: i64,
    pub(crate) is_expired: bool,
    pub(crate) created_at: String,
    pub(crate) expires_at: Option<String>,
}

impl AnnouncementResponse {
    pub(crate) fn from_db(announcement: Announcement) -> Self {
        Self {
            is_expired: is_expired(announcement.expires_at, primitive_now_utc()),
            id: announcement.id,
            title: announcement.title,
            content: announcement.content,
            created_by: announcement.created_by,
            target_class: announcement.target_class,
            is_active: announcement.is_active,
            priority: announcement.priority,
            created_at: format_primitive(announcement.created_at),
            expires_at: announcement.expires_at.map(format_primitive),
        }
    }
}
