pub(crate) mod actor;
pub(crate) mod announcements;
pub(crate) mod assignments;
pub(crate) mod attendance;
pub(crate) mod courses;
pub(crate) mod csv;
pub(crate) mod dashboard;
pub(crate) mod enrollments;
pub(crate) mod error;
pub(crate) mod export;
pub(crate) mod lifecycle;
pub(crate) mod metrics;
pub(crate) mod notifications;
pub(crate) mod paging;
pub(crate) mod student_import;
pub(crate) mod students;
pub(crate) mod submissions;
