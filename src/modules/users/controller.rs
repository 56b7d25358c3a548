use axum::extract::State;
use iqra_core::errors::AppError;
use iqra_core::ApiResponse;
use iqra_models::ids::UserId;
use iqra_models::users::{AdminUpdateUserDto, User, UserFilterParams};
use tracing::instrument;

use super::service::UserService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/users/",
    params(
        ("user_type" = Option<String>, Query, description = "student, teacher or admin"),
        ("is_verified" = Option<bool>, Query, description = "Filter by verification"),
        ("is_active" = Option<bool>, Query, description = "Filter by active flag"),
        ("search" = Option<String>, Query, description = "Matches username, email, first or last name"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)")
    ),
    responses(
        (status = 200, description = "Paginated users", body = Vec<User>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing view_user", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(filters): ValidatedQuery<UserFilterParams>,
) -> Result<ApiResponse<Vec<User>>, AppError> {
    let (users, meta) = UserService::list_users(&state.db, &filters).await?;
    Ok(ApiResponse::ok(users)
        .message("Users retrieved successfully")
        .meta(meta))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = User),
        (status = 403, description = "Missing view_user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn retrieve_user(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<UserId>,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(ApiResponse::ok(user).message("User retrieved successfully"))
}

/// Activate, deactivate, verify or re-tag an account
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "User ID")
    ),
    request_body = AdminUpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid data", body = ErrorResponse),
        (status = 403, description = "Missing change_user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn partial_update_user(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<UserId>,
    ValidatedJson(dto): ValidatedJson<AdminUpdateUserDto>,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::admin_update_user(&state.db, id, dto).await?;
    Ok(ApiResponse::ok(user).message("User updated successfully"))
}
