use axum::{
    extract::State,
    http::StatusCode,
};
use iqra_core::errors::{AppError, field_error};
use iqra_core::ApiResponse;
use iqra_models::ids::StudentProfileId;
use iqra_models::profiles::{
    CreateStudentProfileDto, StudentProfileFilterParams, StudentProfileRecord,
    UpdateStudentProfileDto,
};
use tracing::instrument;

use super::service::StudentProfileService;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/student-profiles/",
    params(
        ("search" = Option<String>, Query, description = "Matches username, student id, grade or major"),
        ("grade" = Option<String>, Query, description = "Exact grade"),
        ("major" = Option<String>, Query, description = "Exact major"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)")
    ),
    responses(
        (status = 200, description = "Paginated student profiles", body = Vec<StudentProfileRecord>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing view_studentprofile", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Student Profiles"
)]
#[instrument(skip(state))]
pub async fn list_student_profiles(
    State(state): State<AppState>,
    ValidatedQuery(filters): ValidatedQuery<StudentProfileFilterParams>,
) -> Result<ApiResponse<Vec<StudentProfileRecord>>, AppError> {
    let (profiles, meta) = StudentProfileService::list(&state.db, &filters).await?;

    Ok(ApiResponse::ok(profiles)
        .message("Student profiles retrieved successfully")
        .meta(meta))
}

#[utoipa::path(
    post,
    path = "/api/student-profiles/",
    request_body = CreateStudentProfileDto,
    responses(
        (status = 201, description = "Student profile created", body = StudentProfileRecord),
        (status = 400, description = "Invalid data or profile already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing add_studentprofile", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Student Profiles"
)]
#[instrument(skip(state, dto))]
pub async fn create_student_profile(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentProfileDto>,
) -> Result<ApiResponse<StudentProfileRecord>, AppError> {
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

    let profile = StudentProfileService::create(&state.db, user.id, dto).await?;
    let record = StudentProfileService::get(&state.db, profile.id).await?;

    Ok(ApiResponse::created(record).message("Student profile created successfully"))
}

#[utoipa::path(
    get,
    path = "/api/student-profiles/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Student profile ID")
    ),
    responses(
        (status = 200, description = "Student profile", body = StudentProfileRecord),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing view_studentprofile", body = ErrorResponse),
        (status = 404, description = "Student profile not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Student Profiles"
)]
#[instrument(skip(state))]
pub async fn retrieve_student_profile(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<StudentProfileId>,
) -> Result<ApiResponse<StudentProfileRecord>, AppError> {
    let record = StudentProfileService::get(&state.db, id).await?;
    Ok(ApiResponse::ok(record).message("Student profile retrieved successfully"))
}

#[utoipa::path(
    put,
    path = "/api/student-profiles/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Student profile ID")
    ),
    request_body = UpdateStudentProfileDto,
    responses(
        (status = 200, description = "Student profile replaced", body = StudentProfileRecord),
        (status = 400, description = "Invalid data", body = ErrorResponse),
        (status = 403, description = "Missing change_studentprofile", body = ErrorResponse),
        (status = 404, description = "Student profile not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Student Profiles"
)]
#[instrument(skip(state, dto))]
pub async fn update_student_profile(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<StudentProfileId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentProfileDto>,
) -> Result<ApiResponse<StudentProfileRecord>, AppError> {
    let record = StudentProfileService::update(&state.db, id, dto, true).await?;
    Ok(ApiResponse::ok(record).message("Student profile updated successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/student-profiles/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Student profile ID")
    ),
    request_body = UpdateStudentProfileDto,
    responses(
        (status = 200, description = "Student profile updated", body = StudentProfileRecord),
        (status = 400, description = "Invalid data", body = ErrorResponse),
        (status = 403, description = "Missing change_studentprofile", body = ErrorResponse),
        (status = 404, description = "Student profile not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Student Profiles"
)]
#[instrument(skip(state, dto))]
pub async fn partial_update_student_profile(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<StudentProfileId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentProfileDto>,
) -> Result<ApiResponse<StudentProfileRecord>, AppError> {
    let record = StudentProfileService::update(&state.db, id, dto, false).await?;
    Ok(ApiResponse::ok(record).message("Student profile updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/student-profiles/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Student profile ID")
    ),
    responses(
        (status = 204, description = "Student profile deleted"),
        (status = 403, description = "Missing delete_studentprofile", body = ErrorResponse),
        (status = 404, description = "Student profile not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Student Profiles"
)]
#[instrument(skip(state))]
pub async fn destroy_student_profile(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<StudentProfileId>,
) -> Result<StatusCode, AppError> {
    StudentProfileService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
