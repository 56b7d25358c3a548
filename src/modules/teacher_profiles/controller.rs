use axum::{
    extract::State,
    http::StatusCode,
};
use iqra_core::errors::{AppError, field_error};
use iqra_core::ApiResponse;
use iqra_models::ids::TeacherProfileId;
use iqra_models::profiles::{
    CreateTeacherProfileDto, TeacherProfileFilterParams, TeacherProfileRecord,
    UpdateTeacherProfileDto,
};
use tracing::instrument;

use super::service::TeacherProfileService;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/teacher-profiles/",
    params(
        ("search" = Option<String>, Query, description = "Matches username, employee id, department or specialization"),
        ("department" = Option<String>, Query, description = "Exact department"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)")
    ),
    responses(
        (status = 200, description = "Paginated teacher profiles", body = Vec<TeacherProfileRecord>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing view_teacherprofile", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Teacher Profiles"
)]
#[instrument(skip(state))]
pub async fn list_teacher_profiles(
    State(state): State<AppState>,
    ValidatedQuery(filters): ValidatedQuery<TeacherProfileFilterParams>,
) -> Result<ApiResponse<Vec<TeacherProfileRecord>>, AppError> {
    let (profiles, meta) = TeacherProfileService::list(&state.db, &filters).await?;

    Ok(ApiResponse::ok(profiles)
        .message("Teacher profiles retrieved successfully")
        .meta(meta))
}

#[utoipa::path(
    post,
    path = "/api/teacher-profiles/",
    request_body = CreateTeacherProfileDto,
    responses(
        (status = 201, description = "Teacher profile created", body = TeacherProfileRecord),
        (status = 400, description = "Invalid data or profile already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing add_teacherprofile", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Teacher Profiles"
)]
#[instrument(skip(state, dto))]
pub async fn create_teacher_profile(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateTeacherProfileDto>,
) -> Result<ApiResponse<TeacherProfileRecord>, AppError> {
    const FAILURE: &str = "Profile creation failed";

    let user_id = dto.user_id.ok_or_else(|| {
        AppError::validation(FAILURE, field_error("user_id", "This field is required."))
    })?;

    let user = UserService::get_user(&state.db, user_id)
        .await
        .map_err(|e| match e.status {
            StatusCode::NOT_FOUND => AppError::validation(
                FAILURE,
                field_error("user_id", format!("Invalid pk \"{}\" - object does not exist.", user_id)),
            ),
            _ => e,
        })?;

    let profile = TeacherProfileService::create(&state.db, user.id, dto).await?;
    let record = TeacherProfileService::get(&state.db, profile.id).await?;

    Ok(ApiResponse::created(record).message("Teacher profile created successfully"))
}

#[utoipa::path(
    get,
    path = "/api/teacher-profiles/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Teacher profile ID")
    ),
    responses(
        (status = 200, description = "Teacher profile", body = TeacherProfileRecord),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing view_teacherprofile", body = ErrorResponse),
        (status = 404, description = "Teacher profile not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Teacher Profiles"
)]
#[instrument(skip(state))]
pub async fn retrieve_teacher_profile(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<TeacherProfileId>,
) -> Result<ApiResponse<TeacherProfileRecord>, AppError> {
    let record = TeacherProfileService::get(&state.db, id).await?;
    Ok(ApiResponse::ok(record).message("Teacher profile retrieved successfully"))
}

#[utoipa::path(
    put,
    path = "/api/teacher-profiles/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Teacher profile ID")
    ),
    request_body = UpdateTeacherProfileDto,
    responses(
        (status = 200, description = "Teacher profile replaced", body = TeacherProfileRecord),
        (status = 400, description = "Invalid data", body = ErrorResponse),
        (status = 403, description = "Missing change_teacherprofile", body = ErrorResponse),
        (status = 404, description = "Teacher profile not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Teacher Profiles"
)]
#[instrument(skip(state, dto))]
pub async fn update_teacher_profile(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<TeacherProfileId>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherProfileDto>,
) -> Result<ApiResponse<TeacherProfileRecord>, AppError> {
    let record = TeacherProfileService::update(&state.db, id, dto, true).await?;
    Ok(ApiResponse::ok(record).message("Teacher profile updated successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/teacher-profiles/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Teacher profile ID")
    ),
    request_body = UpdateTeacherProfileDto,
    responses(
        (status = 200, description = "Teacher profile updated", body = TeacherProfileRecord),
        (status = 400, description = "Invalid data", body = ErrorResponse),
        (status = 403, description = "Missing change_teacherprofile", body = ErrorResponse),
        (status = 404, description = "Teacher profile not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Teacher Profiles"
)]
#[instrument(skip(state, dto))]
pub async fn partial_update_teacher_profile(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<TeacherProfileId>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherProfileDto>,
) -> Result<ApiResponse<TeacherProfileRecord>, AppError> {
    let record = TeacherProfileService::update(&state.db, id, dto, false).await?;
    Ok(ApiResponse::ok(record).message("Teacher profile updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/teacher-profiles/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Teacher profile ID")
    ),
    responses(
        (status = 204, description = "Teacher profile deleted"),
        (status = 403, description = "Missing delete_teacherprofile", body = ErrorResponse),
        (status = 404, description = "Teacher profile not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Teacher Profiles"
)]
#[instrument(skip(state))]
pub async fn destroy_teacher_profile(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<TeacherProfileId>,
) -> Result<StatusCode, AppError> {
    TeacherProfileService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
