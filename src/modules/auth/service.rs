use anyhow::Context;
use iqra_auth::{IdentityProvider, generate_token_key};
use iqra_core::errors::{AppError, field_error};
use iqra_core::password::{check_password, hash_password};
use iqra_core::FailureMessage;
use iqra_models::auth::{GoogleAuthRequest, LoginRequest, RegisterRequest};
use iqra_models::ids::UserId;
use iqra_models::users::{USERNAME_MAX_LENGTH, User};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument, warn};

use crate::modules::users::service::{USER_COLUMNS, UserService};

pub const PASSWORD_MISMATCH: &str = "Password and confirm password don't match";
pub const MISSING_CREDENTIALS: &str = "Must include username and password";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const ACCOUNT_DISABLED: &str = "User account is disabled";

#[derive(FromRow)]
struct Credentials {
    id: UserId,
    password: Option<String>,
    is_active: bool,
}

/// Result of a Google sign-in.
#[derive(Debug)]
pub struct GoogleLogin {
    pub user: User,
    pub token: String,
    pub is_new_user: bool,
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn register(db: &PgPool, dto: RegisterRequest) -> Result<(User, String), AppError> {
        if dto.password != dto.confirm_password {
            return Err(AppError::non_field(
                RegisterRequest::FAILURE_MESSAGE,
                PASSWORD_MISMATCH,
            ));
        }

        UserService::ensure_unique_identity(
            db,
            Some(&dto.username),
            Some(&dto.email),
            None,
            RegisterRequest::FAILURE_MESSAGE,
        )
        .await?;

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (username, email, password, first_name, last_name, user_type, phone)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(hashed_password)
        .bind(dto.first_name.unwrap_or_default())
        .bind(dto.last_name.unwrap_or_default())
        .bind(dto.user_type)
        .bind(dto.phone)
        .fetch_one(db)
        .await
        .map_err(|e| UserService::map_identity_conflict(e, RegisterRequest::FAILURE_MESSAGE))?;

        let (token, _) = Self::get_or_create_token(db, user.id).await?;

        info!(user_id = %user.id, user_type = %user.user_type, "User registered");
        Ok((user, token))
    }

    /// Credentials are checked before the account state, so a disabled
    /// account is only reported to a caller who knows its password.
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn login(db: &PgPool, dto: LoginRequest) -> Result<(User, String), AppError> {
        let failure = LoginRequest::FAILURE_MESSAGE;

        if dto.username.trim().is_empty() || dto.password.is_empty() {
            return Err(AppError::non_field(failure, MISSING_CREDENTIALS));
        }

        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, password, is_active FROM users WHERE username = $1",
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await
        .context("Failed to fetch credentials")
        .map_err(AppError::database)?;

        let Some(credentials) = credentials else {
            warn!("Login attempt for unknown username");
            return Err(AppError::non_field(failure, INVALID_CREDENTIALS));
        };

        if !check_password(&dto.password, credentials.password.as_deref())? {
            warn!(user_id = %credentials.id, "Login attempt with wrong password");
            return Err(AppError::non_field(failure, INVALID_CREDENTIALS));
        }

        if !credentials.is_active {
            warn!(user_id = %credentials.id, "Login attempt on disabled account");
            return Err(AppError::non_field(failure, ACCOUNT_DISABLED));
        }

        let user = UserService::touch_last_login(db, credentials.id).await?;
        let (token, _) = Self::get_or_create_token(db, user.id).await?;

        info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    /// Signs in with a Google access token, creating the identity keyed by
    /// email on first use.
    #[instrument(skip(db, provider, access_token))]
    pub async fn google_login(
        db: &PgPool,
        provider: &dyn IdentityProvider,
        access_token: &str,
    ) -> Result<GoogleLogin, AppError> {
        let info = provider
            .fetch_user_info(access_token)
            .await
            .map_err(|e| {
                AppError::validation(
                    GoogleAuthRequest::FAILURE_MESSAGE,
                    field_error("access_token", e.to_string()),
                )
            })?;

        let username: String = info
            .email
            .chars()
            .take(USERNAME_MAX_LENGTH as usize)
            .collect();

        let inserted = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (username, email, first_name, last_name, is_verified, avatar)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT (email) DO NOTHING
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(&username)
        .bind(&info.email)
        .bind(truncate_name(info.given_name.as_deref()))
        .bind(truncate_name(info.family_name.as_deref()))
        .bind(info.verified_email)
        .bind(&info.picture)
        .fetch_optional(db)
        .await
        .map_err(|e| UserService::map_identity_conflict(e, GoogleAuthRequest::FAILURE_MESSAGE))?;

        let (user, is_new_user) = match inserted {
            Some(user) => (user, true),
            None => (UserService::get_user_by_email(db, &info.email).await?, false),
        };

        if !user.is_active {
            warn!(user_id = %user.id, "Google sign-in on disabled account");
            return Err(AppError::bad_request(anyhow::anyhow!(ACCOUNT_DISABLED)));
        }

        let (token, _) = Self::get_or_create_token(db, user.id).await?;

        info!(user_id = %user.id, is_new_user, "Google sign-in");
        Ok(GoogleLogin {
            user,
            token,
            is_new_user,
        })
    }

    /// Deletes the caller's token.
    #[instrument(skip(db))]
    pub async fn logout(db: &PgPool, user_id: UserId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await
            .context("Failed to delete token")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow::anyhow!("Logout failed")));
        }

        info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Returns the user's token, issuing one if none exists. The flag is
    /// true when a new token was issued.
    #[instrument(skip(db))]
    pub async fn get_or_create_token(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<(String, bool), AppError> {
        let created = sqlx::query_scalar::<_, String>(
            r#"INSERT INTO auth_tokens (key, user_id)
               VALUES ($1, $2)
               ON CONFLICT (user_id) DO NOTHING
               RETURNING key"#,
        )
        .bind(generate_token_key())
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to issue token")
        .map_err(AppError::database)?;

        if let Some(key) = created {
            return Ok((key, true));
        }

        let key = sqlx::query_scalar::<_, String>("SELECT key FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(db)
            .await
            .context("Failed to fetch token")
            .map_err(AppError::database)?;

        Ok((key, false))
    }

    #[instrument(skip(db, key))]
    pub async fn user_for_token(db: &PgPool, key: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = (SELECT user_id FROM auth_tokens WHERE key = $1)"
        ))
        .bind(key)
        .fetch_optional(db)
        .await
        .context("Failed to resolve token")
        .map_err(AppError::database)
    }
}

fn truncate_name(name: Option<&str>) -> String {
    name.unwrap_or_default().chars().take(150).collect()
}
