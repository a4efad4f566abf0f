use sqlx::SqlitePool;

use crate::db::models::{GradeCount, Student};
use crate::repositories;
use crate::services::error::RecordError;
use crate::services::metrics::{percentage, round2};

const OVERVIEW_LIMIT: i64 = 5;

#[derive(Debug, Clone)]
pub(crate) struct DashboardStats {
    pub(crate) total_students: i64,
    pub(crate) total_courses: i64,
    pub(crate) average_marks: f64,
    pub(crate) grade_distribution: Vec<GradeCount>,
    pub(crate) attendance_percentage: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct DashboardOverview {
    pub(crate) stats: DashboardStats,
    pub(crate) top_performers: Vec<Student>,
    pub(crate) recent_students: Vec<Student>,
}

pub(crate) async fn stats(pool: &SqlitePool) -> Result<DashboardStats, RecordError> {
    let aggregate = repositories::stats::student_aggregate(pool).await?;
    let total_courses = repositories::stats::count_active_courses(pool).await?;
    let grade_distribution = repositories::stats::grade_distribution(pool).await?;
    let (total, present) = repositories::attendance::tally_all(pool).await?;

    Ok(DashboardStats {
        total_students: aggregate.total_students,
        total_courses,
        average_marks: aggregate.average_marks.map(round2).unwrap_or(0.0),
        grade_distribution,
        attendance_percentage: percentage(present, total),
    })
}

pub(crate) async fn overview(pool: &SqlitePool) -> Result<DashboardOverview, RecordError> {
    let stats = stats(pool).await?;
    let top_performers = repositories::students::top_by_marks(pool, OVERVIEW_LIMIT).await?;
    let recent_students = repositories::students::most_recent(pool, OVERVIEW_LIMIT).await?;

    Ok(DashboardOverview { stats, top_performers, recent_students })
}
