use anyhow::Context;
use iqra_core::errors::{AppError, field_error};
use iqra_core::{PaginationMeta, contains_pattern};
use iqra_models::ids::{StudentProfileId, UserId};
use iqra_models::profiles::{
    CreateStudentProfileDto, StudentProfile, StudentProfileFilterParams, StudentProfileRecord,
    UpdateStudentProfileDto,
};
use sqlx::PgPool;
use tracing::instrument;

const PROFILE_COLUMNS: &str =
    "id, user_id, student_id, grade, major, enrollment_date, created_at, updated_at";

const RECORD_SELECT: &str = r#"SELECT
        sp.id,
        sp.user_id,
        u.username,
        sp.student_id,
        sp.grade,
        sp.major,
        sp.enrollment_date,
        sp.created_at,
        sp.updated_at
    FROM student_profiles sp
    JOIN users u ON u.id = sp.user_id"#;

pub const PROFILE_EXISTS: &str = "Student profile already exists";
pub const STUDENT_ID_TAKEN: &str = "student profile with this student id already exists.";

pub struct StudentProfileService;

impl StudentProfileService {
    #[instrument(skip(db))]
    pub async fn find_by_user(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Option<StudentProfile>, AppError> {
        sqlx::query_as::<_, StudentProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM student_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student profile")
        .map_err(AppError::database)
    }

    /// Creates the profile for `user_id`; one profile per identity.
    #[instrument(skip(db, dto), fields(student_id = %dto.student_id))]
    pub async fn create(
        db: &PgPool,
        user_id: UserId,
        dto: CreateStudentProfileDto,
    ) -> Result<StudentProfile, AppError> {
        if Self::find_by_user(db, user_id).await?.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(PROFILE_EXISTS)));
        }

        sqlx::query_as::<_, StudentProfile>(&format!(
            r#"INSERT INTO student_profiles (user_id, student_id, grade, major, enrollment_date)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {PROFILE_COLUMNS}"#
        ))
        .bind(user_id)
        .bind(&dto.student_id)
        .bind(dto.grade.unwrap_or_default())
        .bind(dto.major.unwrap_or_default())
        .bind(dto.enrollment_date)
        .fetch_one(db)
        .await
        .map_err(|e| map_profile_conflict(e, "Profile creation failed"))
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: &StudentProfileFilterParams,
    ) -> Result<(Vec<StudentProfileRecord>, PaginationMeta), AppError> {
        let pagination = filters.pagination();

        let mut where_clause = String::from(" WHERE 1=1");
        let mut params: Vec<String> = Vec::new();

        if let Some(grade) = &filters.grade {
            params.push(grade.clone());
            where_clause.push_str(&format!(" AND sp.grade = ${}", params.len()));
        }

        if let Some(major) = &filters.major {
            params.push(major.clone());
            where_clause.push_str(&format!(" AND sp.major = ${}", params.len()));
        }

        if let Some(search) = &filters.search {
            params.push(contains_pattern(search));
            let n = params.len();
            where_clause.push_str(&format!(
                " AND (u.username ILIKE ${n} ESCAPE '\\' OR sp.student_id ILIKE ${n} ESCAPE '\\' OR sp.grade ILIKE ${n} ESCAPE '\\' OR sp.major ILIKE ${n} ESCAPE '\\')"
            ));
        }

        let count_query = format!(
            "SELECT COUNT(*) FROM student_profiles sp JOIN users u ON u.id = sp.user_id{}",
            where_clause
        );
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql
            .fetch_one(db)
            .await
            .context("Failed to count student profiles")
            .map_err(AppError::database)?;

        let data_query = format!(
            "{RECORD_SELECT}{} ORDER BY sp.created_at DESC LIMIT {} OFFSET {}",
            where_clause,
            pagination.limit(),
            pagination.offset()
        );
        let mut data_sql = sqlx::query_as::<_, StudentProfileRecord>(&data_query);
        for param in params {
            data_sql = data_sql.bind(param);
        }
        let profiles = data_sql
            .fetch_all(db)
            .await
            .context("Failed to fetch student profiles")
            .map_err(AppError::database)?;

        Ok((profiles, PaginationMeta::new(total, &pagination)))
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: StudentProfileId) -> Result<StudentProfileRecord, AppError> {
        sqlx::query_as::<_, StudentProfileRecord>(&format!("{RECORD_SELECT} WHERE sp.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch student profile")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student profile not found")))
    }

    /// `full` marks a `PUT`, which must name the `student_id`.
    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: StudentProfileId,
        dto: UpdateStudentProfileDto,
        full: bool,
    ) -> Result<StudentProfileRecord, AppError> {
        if full && dto.student_id.is_none() {
            return Err(AppError::validation(
                "Invalid data provided",
                field_error("student_id", "This field is required."),
            ));
        }

        let updated = sqlx::query_scalar::<_, StudentProfileId>(
            r#"UPDATE student_profiles
               SET student_id = COALESCE($1, student_id),
                   grade = COALESCE($2, grade),
                   major = COALESCE($3, major),
                   enrollment_date = COALESCE($4, enrollment_date),
                   updated_at = NOW()
               WHERE id = $5
               RETURNING id"#,
        )
        .bind(dto.student_id)
        .bind(dto.grade)
        .bind(dto.major)
        .bind(dto.enrollment_date)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_profile_conflict(e, "Invalid data provided"))?;

        match updated {
            Some(id) => Self::get(db, id).await,
            None => Err(AppError::not_found(anyhow::anyhow!(
                "Student profile not found"
            ))),
        }
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: StudentProfileId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM student_profiles WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete student profile")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Student profile not found"
            )));
        }

        Ok(())
    }
}

fn map_profile_conflict(err: sqlx::Error, failure_message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        match db_err.constraint() {
            Some("student_profiles_student_id_key") => {
                return AppError::validation(
                    failure_message,
                    field_error("student_id", STUDENT_ID_TAKEN),
                );
            }
            Some("student_profiles_user_id_key") => {
                return AppError::bad_request(anyhow::anyhow!(PROFILE_EXISTS));
            }
            _ => {}
        }
    }
    AppError::database(err)
}
