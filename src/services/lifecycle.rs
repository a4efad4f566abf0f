use crate::services::error::RecordError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    Active,
    Archived,
    Deleted,
}

/// Which lifecycle states an entity kind can be moved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleKind {
    Student,
    Course,
    Assignment,
    Announcement,
}

impl LifecycleKind {
    fn name(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Course => "course",
            Self::Assignment => "assignment",
            Self::Announcement => "announcement",
        }
    }

    pub(crate) fn supports(self, target: Lifecycle) -> bool {
        match (self, target) {
            (_, Lifecycle::Active) | (_, Lifecycle::Archived) => true,
            (Self::Student | Self::Course, Lifecycle::Deleted) => true,
            (Self::Assignment | Self::Announcement, Lifecycle::Deleted) => false,
        }
    }

    pub(crate) fn ensure(self, target: Lifecycle) -> Result<(), RecordError> {
        if self.supports(target) {
            return Ok(());
        }
        Err(RecordError::validation(
            "mode",
            format!("a {} cannot be moved to {}", self.name(), target.as_str()),
        ))
    }
}

impl Lifecycle {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_students_and_courses_can_be_hard_deleted() {
        assert!(LifecycleKind::Student.supports(Lifecycle::Deleted));
        assert!(LifecycleKind::Course.supports(Lifecycle::Deleted));
        assert!(!LifecycleKind::Assignment.supports(Lifecycle::Deleted));
        assert!(!LifecycleKind::Announcement.supports(Lifecycle::Deleted));
        assert!(LifecycleKind::Assignment.supports(Lifecycle::Archived));
    }

    #[test]
    fn unsupported_transition_names_the_mode_field() {
        let err = LifecycleKind::Assignment.ensure(Lifecycle::Deleted).unwrap_err();
        assert!(matches!(err, RecordError::Validation { field: "mode", .. }));
    }
}
