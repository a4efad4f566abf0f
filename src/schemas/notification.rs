use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Notification;
use crate::db::types::NotificationType;
use crate::services::notifications::{Inbox, NotificationDraft};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct NotificationCreate {
    #[serde(alias = "userId", alias = "user")]
    pub(crate) user_id: String,
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub(crate) title: String,
    pub(crate) message: String,
    #[serde(default, alias = "notificationType")]
    pub(crate) notification_type: NotificationType,
    #[serde(default)]
    pub(crate) link: Option<String>,
}

impl NotificationCreate {
    pub(crate) fn into_draft(self) -> NotificationDraft {
        NotificationDraft {
            user_id: self.user_id,
            title: self.title,
            message: self.message,
            notification_type: self.notification_type,
            link: self.link,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NotificationResponse {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) notification_type: NotificationType,
    pub(crate) is_read: bool,
    pub(crate) link: Option<String>,
    pub(crate) created_at: String,
}

impl NotificationResponse {
    pub(crate) fn from_db(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            notification_type: notification.notification_type,
            is_read: notification.is_read,
            link: notification.link,
            created_at: format_primitive(notification.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InboxResponse {
    pub(crate) unread_count: i64,
    pub(crate) notifications: Vec<NotificationResponse>,
}

impl InboxResponse {
    pub(crate) fn from_inbox(inbox: Inbox) -> Self {
        Self {
            unread_count: inbox.unread_count,
            notifications: inbox
                .notifications
                .into_iter()
                .map(NotificationResponse::from_db)
                .collect(),
        }
    }
}
