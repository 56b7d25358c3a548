use axum::{Json, extract::State, http::StatusCode};
use iqra_core::errors::AppError;
use iqra_models::auth::{
    ProfileResponse, StudentProfileCreatedResponse, TeacherProfileCreatedResponse,
};
use iqra_models::profiles::{CreateStudentProfileDto, CreateTeacherProfileDto};
use iqra_models::users::UpdateProfileDto;
use tracing::instrument;

use super::service::ProfileService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/profile/",
    responses(
        (status = 200, description = "Caller's profile with any student or teacher profile embedded", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Profile"
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = ProfileService::get_profile(&state.db, auth_user.0).await?;

    Ok(Json(ProfileResponse {
        success: true,
        message: None,
        user,
    }))
}

/// Update the caller's profile
///
/// Every field is optional; omitted fields keep their value.
#[utoipa::path(
    put,
    path = "/api/profile/",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated successfully", body = ProfileResponse),
        (status = 400, description = "Profile update failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Profile"
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = %auth_user.0.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = ProfileService::update_profile(&state.db, &auth_user.0, dto).await?;

    Ok(Json(ProfileResponse {
        success: true,
        message: Some("Profile updated successfully".to_string()),
        user,
    }))
}

/// Create the caller's student profile
///
/// The role and existing-profile checks run before the body is validated.
#[utoipa::path(
    post,
    path = "/api/profile/student/",
    request_body = CreateStudentProfileDto,
    responses(
        (status = 201, description = "Student profile created successfully", body = StudentProfileCreatedResponse),
        (status = 400, description = "Profile already exists or creation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is not a student", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Profile"
)]
#[instrument(skip(state, auth_user, body), fields(user_id = %auth_user.0.id))]
pub async fn create_student_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    body: Result<ValidatedJson<CreateStudentProfileDto>, AppError>,
) -> Result<(StatusCode, Json<StudentProfileCreatedResponse>), AppError> {
    ProfileService::check_student_profile_allowed(&state.db, &auth_user.0).await?;
    let ValidatedJson(dto) = body?;

    let profile = ProfileService::create_student_profile(&state.db, &auth_user.0, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(StudentProfileCreatedResponse {
            success: true,
            message: "Student profile created successfully".to_string(),
            profile: profile.into(),
        }),
    ))
}

/// Create the caller's teacher profile
#[utoipa::path(
    post,
    path = "/api/profile/teacher/",
    request_body = CreateTeacherProfileDto,
    responses(
        (status = 201, description = "Teacher profile created successfully", body = TeacherProfileCreatedResponse),
        (status = 400, description = "Profile already exists or creation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is not a teacher", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Profile"
)]
#[instrument(skip(state, auth_user, body), fields(user_id = %auth_user.0.id))]
pub async fn create_teacher_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    body: Result<ValidatedJson<CreateTeacherProfileDto>, AppError>,
) -> Result<(StatusCode, Json<TeacherProfileCreatedResponse>), AppError> {
    ProfileService::check_teacher_profile_allowed(&state.db, &auth_user.0).await?;
    let ValidatedJson(dto) = body?;

    let profile = ProfileService::create_teacher_profile(&state.db, &auth_user.0, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(TeacherProfileCreatedResponse {
            success: true,
            message: "Teacher profile created successfully".to_string(),
            profile: profile.into(),
        }),
    ))
}
