use sqlx::SqlitePool;

use crate::db::models::GradeCount;

pub(crate) struct StudentAggregate {
    pub(crate) total_students: i64,
    pub(crate) average_marks: Option<f64>,
}

pub(crate) async fn student_aggregate(pool: &SqlitePool) -> Result<StudentAggregate, sqlx::Error> {
    let (total_students, average_marks) = sqlx::query_as::<_, (i64, Option<f64>)>(
        "SELECT COUNT(*), AVG(marks) FROM students WHERE is_active = 1",
    )
    .fetch_one(pool)
    .await?;

    Ok(StudentAggregate { total_students, average_marks })
}

pub(crate) async fn count_active_courses(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE is_active = 1").fetch_one(pool).await
}

/// Only grades that occur are returned, alphabetically.
pub(crate) async fn grade_distribution(pool: &SqlitePool) -> Result<Vec<GradeCount>, sqlx::Error> {
    sqlx::query_as::<_, GradeCount>(
        "SELECT grade, COUNT(*) AS count FROM students
         WHERE is_active = 1
         GROUP BY grade
         ORDER BY grade ASC",
    )
    .fetch_all(pool)
    .await
}
