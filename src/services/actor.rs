/// Identity attached to a write. Anonymous writes leave the
/// `marked_by`/`created_by`/`graded_by` references empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Actor {
    user_id: Option<String>,
}

impl Actor {
    pub(crate) fn user(user_id: impl Into<String>) -> Self {
        Self { user_id: Some(user_id.into()) }
    }

    pub(crate) fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub(crate) fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Value used in log fields.
    pub(crate) fn label(&self) -> &str {
        self.user_id.as_deref().unwrap_or("anonymous")
    }
}
