use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::{Date, PrimitiveDateTime};

use crate::db::models::Student;
use crate::db::types::{Gender, Grade};

pub(crate) const STUDENT_COLUMNS: &str = "\
    id, name, roll_number, email, phone, date_of_birth, gender, address, city, state, \
    postal_code, country, guardian_name, guardian_phone, guardian_email, guardian_relation, \
    marks, grade, admission_date, class_name, section, notes, is_active, created_at, updated_at";

/// `STUDENT_COLUMNS` prefixed with a table alias, for joins.
pub(crate) fn qualified_columns(alias: &str) -> String {
    STUDENT_COLUMNS
        .split(',')
        .map(|column| format!("{alias}.{}", column.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every persisted column except identity and timestamps.
pub(crate) struct StudentValues<'a> {
    pub(crate) name: &'a str,
    pub(crate) roll_number: i64,
    pub(crate) email: &'a str,
    pub(crate) phone: Option<&'a str>,
    pub(crate) date_of_birth: Option<Date>,
    pub(crate) gender: Option<Gender>,
    pub(crate) address: Option<&'a str>,
    pub(crate) city: Option<&'a str>,
    pub(crate) state: Option<&'a str>,
    pub(crate) postal_code: Option<&'a str>,
    pub(crate) country: &'a str,
    pub(crate) guardian_name: Option<&'a str>,
    pub(crate) guardian_phone: Option<&'a str>,
    pub(crate) guardian_email: Option<&'a str>,
    pub(crate) guardian_relation: Option<&'a str>,
    pub(crate) marks: f64,
    pub(crate) grade: Grade,
    pub(crate) admission_date: Date,
    pub(crate) class_name: Option<&'a str>,
    pub(crate) section: Option<&'a str>,
    pub(crate) notes: Option<&'a str>,
    pub(crate) is_active: bool,
}

#[derive(Debug, Default)]
pub(crate) struct StudentFilter<'a> {
    pub(crate) search: Option<&'a str>,
    pub(crate) grade: Option<Grade>,
    pub(crate) marks_min: Option<f64>,
    pub(crate) marks_max: Option<f64>,
    pub(crate) class_name: Option<&'a str>,
    pub(crate) section: Option<&'a str>,
    pub(crate) gender: Option<Gender>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum StudentSort {
    Name,
    NameDesc,
    RollNumber,
    RollNumberDesc,
    Marks,
    MarksDesc,
    CreatedAt,
    #[default]
    CreatedAtDesc,
}

impl StudentSort {
    /// Unknown keys fall back to newest first.
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("name") => Self::Name,
            Some("-name") => Self::NameDesc,
            Some("roll_number") => Self::RollNumber,
            Some("-roll_number") => Self::RollNumberDesc,
            Some("marks") => Self::Marks,
            Some("-marks") => Self::MarksDesc,
            Some("created_at") => Self::CreatedAt,
            _ => Self::CreatedAtDesc,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::NameDesc => "-name",
            Self::RollNumber => "roll_number",
            Self::RollNumberDesc => "-roll_number",
            Self::Marks => "marks",
            Self::MarksDesc => "-marks",
            Self::CreatedAt => "created_at",
            Self::CreatedAtDesc => "-created_at",
        }
    }

    fn order_by(self) -> &'static str {
        match self {
            Self::Name => " ORDER BY name ASC, id ASC",
            Self::NameDesc => " ORDER BY name DESC, id ASC",
            Self::RollNumber => " ORDER BY roll_number ASC",
            Self::RollNumberDesc => " ORDER BY roll_number DESC",
            Self::Marks => " ORDER BY marks ASC, id ASC",
            Self::MarksDesc => " ORDER BY marks DESC, id ASC",
            Self::CreatedAt => " ORDER BY created_at ASC, id ASC",
            Self::CreatedAtDesc => " ORDER BY created_at DESC, id DESC",
        }
    }
}

pub(crate) async fn create(
    executor: impl sqlx::SqliteExecutor<'_>,
    id: &str,
    values: &StudentValues<'_>,
    now: PrimitiveDateTime,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (
            id, name, roll_number, email, phone, date_of_birth, gender, address, city, state,
            postal_code, country, guardian_name, guardian_phone, guardian_email,
            guardian_relation, marks, grade, admission_date, class_name, section, notes,
            is_active, created_at, updated_at
         ) VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?)
         RETURNING {STUDENT_COLUMNS}",
    ))
    .bind(id)
    .bind(values.name)
    .bind(values.roll_number)
    .bind(values.email)
    .bind(values.phone)
    .bind(values.date_of_birth)
    .bind(values.gender)
    .bind(values.address)
    .bind(values.city)
    .bind(values.state)
    .bind(values.postal_code)
    .bind(values.country)
    .bind(values.guardian_name)
    .bind(values.guardian_phone)
    .bind(values.guardian_email)
    .bind(values.guardian_relation)
    .bind(values.marks)
    .bind(values.grade)
    .bind(values.admission_date)
    .bind(values.class_name)
    .bind(values.section)
    .bind(values.notes)
    .bind(values.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub(crate) async fn update(
    executor: impl sqlx::SqliteExecutor<'_>,
    id: &str,
    values: &StudentValues<'_>,
    now: PrimitiveDateTime,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "UPDATE students SET
            name = ?, roll_number = ?, email = ?, phone = ?, date_of_birth = ?, gender = ?,
            address = ?, city = ?, state = ?, postal_code = ?, country = ?,
            guardian_name = ?, guardian_phone = ?, guardian_email = ?, guardian_relation = ?,
            marks = ?, grade = ?, admission_date = ?, class_name = ?, section = ?, notes = ?,
            is_active = ?, updated_at = ?
         WHERE id = ?
         RETURNING {STUDENT_COLUMNS}",
    ))
    .bind(values.name)
    .bind(values.roll_number)
    .bind(values.email)
    .bind(values.phone)
    .bind(values.date_of_birth)
    .bind(values.gender)
    .bind(values.address)
    .bind(values.city)
    .bind(values.state)
    .bind(values.postal_code)
    .bind(values.country)
    .bind(values.guardian_name)
    .bind(values.guardian_phone)
    .bind(values.guardian_email)
    .bind(values.guardian_relation)
    .bind(values.marks)
    .bind(values.grade)
    .bind(values.admission_date)
    .bind(values.class_name)
    .bind(values.section)
    .bind(values.notes)
    .bind(values.is_active)
    .bind(now)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM students WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Id of another student already holding `roll_number`, if any.
pub(crate) async fn roll_number_owner(
    pool: &SqlitePool,
    roll_number: i64,
    excluding: Option<&str>,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM students WHERE roll_number = ? AND id IS NOT ? LIMIT 1")
        .bind(roll_number)
        .bind(excluding)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn email_owner(
    pool: &SqlitePool,
    email: &str,
    excluding: Option<&str>,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM students WHERE email = ? AND id IS NOT ? LIMIT 1")
        .bind(email)
        .bind(excluding)
        .fetch_optional(pool)
        .await
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &StudentFilter<'_>) {
    builder.push(" WHERE is_active = 1");

    if let Some(search) = filter.search.map(str::trim).filter(|value| !value.is_empty()) {
        let pattern = super::contains_pattern(search);
        builder.push(" AND (name LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\' OR CAST(roll_number AS TEXT) LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\' OR email LIKE ");
        builder.push_bind(pattern);
        builder.push(" ESCAPE '\\')");
    }
    if let Some(grade) = filter.grade {
        builder.push(" AND grade = ");
        builder.push_bind(grade);
    }
    if let Some(marks_min) = filter.marks_min {
        builder.push(" AND marks >= ");
        builder.push_bind(marks_min);
    }
    if let Some(marks_max) = filter.marks_max {
        builder.push(" AND marks <= ");
        builder.push_bind(marks_max);
    }
    if let Some(class_name) = filter.class_name {
        builder.push(" AND class_name = ");
        builder.push_bind(class_name.to_string());
    }
    if let Some(section) = filter.section {
        builder.push(" AND section = ");
        builder.push_bind(section.to_string());
    }
    if let Some(gender) = filter.gender {
        builder.push(" AND gender = ");
        builder.push_bind(gender);
    }
}

pub(crate) async fn count_active(
    pool: &SqlitePool,
    filter: &StudentFilter<'_>,
) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM students");
    push_filters(&mut builder, filter);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

pub(crate) async fn list_active(
    pool: &SqlitePool,
    filter: &StudentFilter<'_>,
    sort: StudentSort,
    offset: i64,
    limit: i64,
) -> Result<Vec<Student>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Sqlite>::new(format!("SELECT {STUDENT_COLUMNS} FROM students"));
    push_filters(&mut builder, filter);
    builder.push(sort.order_by());
    builder.push(" LIMIT ");
    builder.push_bind(limit.max(1));
    builder.push(" OFFSET ");
    builder.push_bind(offset.max(0));

    builder.build_query_as::<Student>().fetch_all(pool).await
}

/// Active students in default order, unpaginated.
pub(crate) async fn list_all_active(pool: &SqlitePool) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE is_active = 1
         ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn top_by_marks(pool: &SqlitePool, limit: i64) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE is_active = 1
         ORDER BY marks DESC, created_at DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn most_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE is_active = 1
         ORDER BY created_at DESC, id DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn set_active(
    pool: &SqlitePool,
    id: &str,
    is_active: bool,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE students SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete_many(pool: &SqlitePool, ids: &[String]) -> Result<u64, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM students WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.as_str());
    }
    separated.push_unseparated(")");

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

pub(crate) async fn count_active_enrollments(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE student_id = ? AND is_active = 1")
        .bind(student_id)
        .fetch_one(pool)
        .await
}
