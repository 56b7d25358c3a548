use anyhow::Context;
use iqra_core::errors::{AppError, field_error};
use iqra_core::{PaginationMeta, contains_pattern};
use iqra_models::ids::{TeacherProfileId, UserId};
use iqra_models::profiles::{
    CreateTeacherProfileDto, TeacherProfile, TeacherProfileFilterParams, TeacherProfileRecord,
    UpdateTeacherProfileDto,
};
use sqlx::PgPool;
use tracing::instrument;

const PROFILE_COLUMNS: &str =
    "id, user_id, employee_id, department, specialization, hire_date, created_at, updated_at";

const RECORD_SELECT: &str = r#"SELECT
        tp.id,
        tp.user_id,
        u.username,
        tp.employee_id,
        tp.department,
        tp.specialization,
        tp.hire_date,
        tp.created_at,
        tp.updated_at
    FROM teacher_profiles tp
    JOIN users u ON u.id = tp.user_id"#;

pub const PROFILE_EXISTS: &str = "Teacher profile already exists";
pub const EMPLOYEE_ID_TAKEN: &str = "teacher profile with this employee id already exists.";

pub struct TeacherProfileService;

impl TeacherProfileService {
    #[instrument(skip(db))]
    pub async fn find_by_user(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Option<TeacherProfile>, AppError> {
        sqlx::query_as::<_, TeacherProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM teacher_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch teacher profile")
        .map_err(AppError::database)
    }

    /// Creates the profile for `user_id`; one profile per identity.
    #[instrument(skip(db, dto), fields(employee_id = %dto.employee_id))]
    pub async fn create(
        db: &PgPool,
        user_id: UserId,
        dto: CreateTeacherProfileDto,
    ) -> Result<TeacherProfile, AppError> {
        if Self::find_by_user(db, user_id).await?.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(PROFILE_EXISTS)));
        }

        sqlx::query_as::<_, TeacherProfile>(&format!(
            r#"INSERT INTO teacher_profiles (user_id, employee_id, department, specialization, hire_date)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {PROFILE_COLUMNS}"#
        ))
        .bind(user_id)
        .bind(&dto.employee_id)
        .bind(dto.department.unwrap_or_default())
        .bind(dto.specialization.unwrap_or_default())
        .bind(dto.hire_date)
        .fetch_one(db)
        .await
        .map_err(|e| map_profile_conflict(e, "Profile creation failed"))
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: &TeacherProfileFilterParams,
    ) -> Result<(Vec<TeacherProfileRecord>, PaginationMeta), AppError> {
        let pagination = filters.pagination();

        let mut where_clause = String::from(" WHERE 1=1");
        let mut params: Vec<String> = Vec::new();

        if let Some(department) = &filters.department {
            params.push(department.clone());
            where_clause.push_str(&format!(" AND tp.department = ${}", params.len()));
        }

        if let Some(search) = &filters.search {
            params.push(contains_pattern(search));
            let n = params.len();
            where_clause.push_str(&format!(
                " AND (u.username ILIKE ${n} ESCAPE '\\' OR tp.employee_id ILIKE ${n} ESCAPE '\\' OR tp.department ILIKE ${n} ESCAPE '\\' OR tp.specialization ILIKE ${n} ESCAPE '\\')"
            ));
        }

        let count_query = format!(
            "SELECT COUNT(*) FROM teacher_profiles tp JOIN users u ON u.id = tp.user_id{}",
            where_clause
        );
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql
            .fetch_one(db)
            .await
            .context("Failed to count teacher profiles")
            .map_err(AppError::database)?;

        let data_query = format!(
            "{RECORD_SELECT}{} ORDER BY tp.created_at DESC LIMIT {} OFFSET {}",
            where_clause,
            pagination.limit(),
            pagination.offset()
        );
        let mut data_sql = sqlx::query_as::<_, TeacherProfileRecord>(&data_query);
        for param in params {
            data_sql = data_sql.bind(param);
        }
        let profiles = data_sql
            .fetch_all(db)
            .await
            .context("Failed to fetch teacher profiles")
            .map_err(AppError::database)?;

        Ok((profiles, PaginationMeta::new(total, &pagination)))
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: TeacherProfileId) -> Result<TeacherProfileRecord, AppError> {
        sqlx::query_as::<_, TeacherProfileRecord>(&format!("{RECORD_SELECT} WHERE tp.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch teacher profile")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher profile not found")))
    }

    /// `full` marks a `PUT`, which must name the `employee_id`.
    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: TeacherProfileId,
        dto: UpdateTeacherProfileDto,
        full: bool,
    ) -> Result<TeacherProfileRecord, AppError> {
        if full && dto.employee_id.is_none() {
            return Err(AppError::validation(
                "Invalid data provided",
                field_error("employee_id", "This field is required."),
            ));
        }

        let updated = sqlx::query_scalar::<_, TeacherProfileId>(
            r#"UPDATE teacher_profiles
               SET employee_id = COALESCE($1, employee_id),
                   department = COALESCE($2, department),
                   specialization = COALESCE($3, specialization),
                   hire_date = COALESCE($4, hire_date),
                   updated_at = NOW()
               WHERE id = $5
               RETURNING id"#,
        )
        .bind(dto.employee_id)
        .bind(dto.department)
        .bind(dto.specialization)
        .bind(dto.hire_date)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_profile_conflict(e, "Invalid data provided"))?;

        match updated {
            Some(id) => Self::get(db, id).await,
            None => Err(AppError::not_found(anyhow::anyhow!(
                "Teacher profile not found"
            ))),
        }
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: TeacherProfileId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM teacher_profiles WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete teacher profile")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Teacher profile not found"
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
            Some("teacher_profiles_employee_id_key") => {
                return AppError::validation(
                    failure_message,
                    field_error("employee_id", EMPLOYEE_ID_TAKEN),
                );
            }
            Some("teacher_profiles_user_id_key") => {
                return AppError::bad_request(anyhow::anyhow!(PROFILE_EXISTS));
            }
            _ => {}
        }
    }
    AppError::database(err)
}
