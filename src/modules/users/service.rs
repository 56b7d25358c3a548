use anyhow::Context;
use iqra_core::errors::{AppError, field_error, merge_field_errors};
use iqra_core::{PaginationMeta, contains_pattern};
use iqra_models::ids::UserId;
use iqra_models::users::{AdminUpdateUserDto, UpdateProfileDto, User, UserFilterParams, UserProfile};
use serde_json::{Value, json};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::student_profiles::service::StudentProfileService;
use crate::modules::teacher_profiles::service::TeacherProfileService;

pub const USER_COLUMNS: &str = "id, username, email, first_name, last_name, user_type, phone, \
     avatar, is_verified, is_active, is_staff, is_superuser, date_joined, last_login, \
     created_at, updated_at";

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const EMAIL_TAKEN: &str = "user with this email already exists.";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_user_by_email(db: &PgPool, email: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user by email")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    /// The identity with its student and teacher profiles embedded.
    #[instrument(skip(db, user), fields(user_id = %user.id))]
    pub async fn profile_for(db: &PgPool, user: User) -> Result<UserProfile, AppError> {
        let student = StudentProfileService::find_by_user(db, user.id).await?;
        let teacher = TeacherProfileService::find_by_user(db, user.id).await?;
        Ok(UserProfile::from_parts(user, student, teacher))
    }

    #[instrument(skip(db))]
    pub async fn touch_last_login(db: &PgPool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET last_login = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to update last login")
        .map_err(AppError::database)
    }

    /// Rejects a username or email already held by another identity.
    #[instrument(skip(db))]
    pub async fn ensure_unique_identity(
        db: &PgPool,
        username: Option<&str>,
        email: Option<&str>,
        exclude: Option<UserId>,
        failure_message: &str,
    ) -> Result<(), AppError> {
        let mut errors = json!({});

        if let Some(username) = username {
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id IS DISTINCT FROM $2)",
            )
            .bind(username)
            .bind(exclude)
            .fetch_one(db)
            .await
            .context("Failed to check username")
            .map_err(AppError::database)?;

            if taken {
                errors = merge_field_errors(errors, field_error("username", USERNAME_TAKEN));
            }
        }

        if let Some(email) = email {
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id IS DISTINCT FROM $2)",
            )
            .bind(email)
            .bind(exclude)
            .fetch_one(db)
            .await
            .context("Failed to check email")
            .map_err(AppError::database)?;

            if taken {
                errors = merge_field_errors(errors, field_error("email", EMAIL_TAKEN));
            }
        }

        match errors {
            Value::Object(ref map) if map.is_empty() => Ok(()),
            errors => Err(AppError::validation(failure_message, errors)),
        }
    }

    /// Maps a unique violation on `users` to the field it concerns.
    pub fn map_identity_conflict(err: sqlx::Error, failure_message: &str) -> AppError {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            match db_err.constraint() {
                Some("users_username_key") => {
                    return AppError::validation(
                        failure_message,
                        field_error("username", USERNAME_TAKEN),
                    );
                }
                Some("users_email_key") => {
                    return AppError::validation(failure_message, field_error("email", EMAIL_TAKEN));
                }
                _ => {}
            }
        }
        AppError::database(err)
    }

    /// Partial update of the caller's own identity.
    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        id: UserId,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        const FAILURE: &str = "Profile update failed";

        Self::ensure_unique_identity(
            db,
            dto.username.as_deref(),
            dto.email.as_deref(),
            Some(id),
            FAILURE,
        )
        .await?;

        sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET username = COALESCE($1, username),
                   email = COALESCE($2, email),
                   first_name = COALESCE($3, first_name),
                   last_name = COALESCE($4, last_name),
                   user_type = COALESCE($5, user_type),
                   phone = COALESCE($6, phone),
                   avatar = COALESCE($7, avatar),
                   updated_at = NOW()
               WHERE id = $8
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(dto.username)
        .bind(dto.email)
        .bind(dto.first_name)
        .bind(dto.last_name)
        .bind(dto.user_type)
        .bind(dto.phone)
        .bind(dto.avatar)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| Self::map_identity_conflict(e, FAILURE))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db))]
    pub async fn list_users(
        db: &PgPool,
        filters: &UserFilterParams,
    ) -> Result<(Vec<User>, PaginationMeta), AppError> {
        let pagination = filters.pagination();

        let mut where_clause = String::from(" WHERE 1=1");
        let mut params: Vec<String> = Vec::new();

        if let Some(user_type) = filters.user_type {
            params.push(user_type.as_str().to_string());
            where_clause.push_str(&format!(" AND user_type = ${}::user_type", params.len()));
        }

        if let Some(is_verified) = filters.is_verified {
            where_clause.push_str(&format!(" AND is_verified = {}", is_verified));
        }

        if let Some(is_active) = filters.is_active {
            where_clause.push_str(&format!(" AND is_active = {}", is_active));
        }

        if let Some(search) = &filters.search {
            params.push(contains_pattern(search));
            let n = params.len();
            where_clause.push_str(&format!(
                " AND (username ILIKE ${n} ESCAPE '\\' OR email ILIKE ${n} ESCAPE '\\' OR first_name ILIKE ${n} ESCAPE '\\' OR last_name ILIKE ${n} ESCAPE '\\')"
            ));
        }

        let count_query = format!("SELECT COUNT(*) FROM users{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql
            .fetch_one(db)
            .await
            .context("Failed to count users")
            .map_err(AppError::database)?;

        let data_query = format!(
            "SELECT {USER_COLUMNS} FROM users{} ORDER BY date_joined DESC LIMIT {} OFFSET {}",
            where_clause,
            pagination.limit(),
            pagination.offset()
        );
        let mut data_sql = sqlx::query_as::<_, User>(&data_query);
        for param in params {
            data_sql = data_sql.bind(param);
        }
        let users = data_sql
            .fetch_all(db)
            .await
            .context("Failed to fetch users")
            .map_err(AppError::database)?;

        Ok((users, PaginationMeta::new(total, &pagination)))
    }

    #[instrument(skip(db))]
    pub async fn admin_update_user(
        db: &PgPool,
        id: UserId,
        dto: AdminUpdateUserDto,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET is_active = COALESCE($1, is_active),
                   is_verified = COALESCE($2, is_verified),
                   user_type = COALESCE($3, user_type),
                   updated_at = NOW()
               WHERE id = $4
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(dto.is_active)
        .bind(dto.is_verified)
        .bind(dto.user_type)
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to update user")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }
}
