use axum::{Json, extract::State, http::StatusCode};
use iqra_core::errors::AppError;
use iqra_models::auth::{
    AuthResponse, GoogleAuthRequest, GoogleAuthResponse, LoginRequest, MessageResponse,
    RegisterRequest,
};
use serde_json::Value;
use tracing::instrument;
use utoipa::ToSchema;

use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Failure envelope shared by every endpoint.
#[derive(ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub errors: Value,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation failed, passwords differ, or username/email taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (user, token) = AuthService::register(&state.db, dto).await?;
    let user = UserService::profile_for(&state.db, user).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully".to_string(),
            user,
            token,
        }),
    ))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing fields, invalid credentials, or disabled account", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, token) = AuthService::login(&state.db, dto).await?;
    let user = UserService::profile_for(&state.db, user).await?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        user,
        token,
    }))
}

/// Sign in with a Google OAuth access token
///
/// Creates the account on first use, keyed by the Google email address.
#[utoipa::path(
    post,
    path = "/api/auth/google/",
    request_body = GoogleAuthRequest,
    responses(
        (status = 200, description = "Signed in or registered via Google", body = GoogleAuthResponse),
        (status = 400, description = "Google rejected the token or could not be reached", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn google_auth(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<GoogleAuthRequest>,
) -> Result<Json<GoogleAuthResponse>, AppError> {
    let login =
        AuthService::google_login(&state.db, state.identity_provider.as_ref(), &dto.access_token)
            .await?;

    let message = if login.is_new_user {
        "User registered successfully via Google"
    } else {
        "Google authentication successful"
    };
    let user = UserService::profile_for(&state.db, login.user).await?;

    Ok(Json(GoogleAuthResponse {
        success: true,
        message: message.to_string(),
        user,
        token: login.token,
        is_new_user: login.is_new_user,
    }))
}

/// Revoke the caller's access token
#[utoipa::path(
    post,
    path = "/api/auth/logout/",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 400, description = "Logout failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::logout(&state.db, auth_user.0.id).await?;
    Ok(Json(MessageResponse::ok("Logout successful")))
}
