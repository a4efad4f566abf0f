use serde::Serialize;

use crate::db::models::GradeCount;
use crate::db::types::Grade;
use crate::schemas::student::StudentResponse;
use crate::services::dashboard::{DashboardOverview, DashboardStats};

#[derive(Debug, Serialize)]
pub(crate) struct GradeCountResponse {
    pub(crate) grade: Grade,
    pub(crate) count: i64,
}

impl From<GradeCount> for GradeCountResponse {
    fn from(row: GradeCount) -> Self {
        Self { grade: row.grade, count: row.count }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StatsResponse {
    pub(crate) total_students: i64,
    pub(crate) total_courses: i64,
    pub(crate) average_marks: f64,
    pub(crate) grade_distribution: Vec<GradeCountResponse>,
    pub(crate) attendance_percentage: f64,
}

impl StatsResponse {
    pub(crate) fn from_stats(stats: DashboardStats) -> Self {
        Self {
            total_students: stats.total_students,
            total_courses: stats.total_courses,
            average_marks: stats.average_marks,
            grade_distribution: stats.grade_distribution.into_iter().map(Into::into).collect(),
            attendance_percentage: stats.attendance_percentage,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DashboardResponse {
    #[serde(flatten)]
    pub(crate) stats: StatsResponse,
    pub(crate) top_performers: Vec<StudentResponse>,
    pub(crate) recent_students: Vec<StudentResponse>,
}

impl DashboardResponse {
    pub(crate) fn from_overview(overview: DashboardOverview) -> Self {
        Self {
            stats: StatsResponse::from_stats(overview.stats),
            top_performers: overview.top_performers.into_iter().map(StudentResponse::from_db).collect(),
            recent_students: overview
                .recent_students
                .into_iter()
                .map(StudentResponse::from_db)
                .collect(),
        }
    }
}
