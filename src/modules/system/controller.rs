use axum::{Json, body::Bytes, http::StatusCode};
use chrono::Utc;
use iqra_core::errors::{AppError, NON_FIELD_ERRORS, field_error};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;
use utoipa::ToSchema;

pub const APP_NAME: &str = "usermanagement";
pub const API_VERSION: &str = "1.0.0";

pub const FEATURES: [&str; 6] = [
    "User Management",
    "Course Management",
    "Learning Progress Tracking",
    "Online Examinations",
    "Grade Management",
    "Google OAuth Authentication",
];

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub version: String,
    pub app: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectInfoResponse {
    pub project_name: String,
    pub description: String,
    pub features: Vec<String>,
    pub status: String,
    pub api_version: String,
    pub framework: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TestGetResponse {
    pub method: String,
    pub message: String,
    pub data: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TestPostResponse {
    pub method: String,
    pub message: String,
    #[schema(value_type = Object)]
    pub received_data: Value,
    pub timestamp: String,
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

#[utoipa::path(
    get,
    path = "/api/health/",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "success".to_string(),
        message: "🎓 Student E-Learning Platform Backend System is running normally!".to_string(),
        timestamp: now(),
        version: API_VERSION.to_string(),
        app: APP_NAME.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/info/",
    responses(
        (status = 200, description = "Project description and feature list", body = ProjectInfoResponse)
    ),
    tag = "System"
)]
pub async fn project_info() -> Json<ProjectInfoResponse> {
    Json(ProjectInfoResponse {
        project_name: "IQRA Backend - Student E-Learning Platform".to_string(),
        description: "Backend API system providing online learning services for students"
            .to_string(),
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
        status: "In Development".to_string(),
        api_version: "v1".to_string(),
        framework: "Axum".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/test/",
    responses(
        (status = 200, description = "Echo test", body = TestGetResponse)
    ),
    tag = "System"
)]
pub async fn test_get() -> Json<TestGetResponse> {
    Json(TestGetResponse {
        method: "GET".to_string(),
        message: "GET request test successful!".to_string(),
        data: "This is a test endpoint proving the API is working".to_string(),
    })
}

/// Echoes the posted JSON back. An empty body echoes `{}`.
#[utoipa::path(
    post,
    path = "/api/test/",
    request_body(content = Object, description = "Any JSON document"),
    responses(
        (status = 201, description = "Echoed payload", body = TestPostResponse),
        (status = 400, description = "Body is not JSON", body = crate::modules::auth::controller::ErrorResponse)
    ),
    tag = "System"
)]
#[instrument(skip(body))]
pub async fn test_post(body: Bytes) -> Result<(StatusCode, Json<TestPostResponse>), AppError> {
    let received_data = parse_echo_body(&body)?;

    Ok((
        StatusCode::CREATED,
        Json(TestPostResponse {
            method: "POST".to_string(),
            message: "POST request test successful!".to_string(),
            received_data,
            timestamp: now(),
        }),
    ))
}

fn parse_echo_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }

    serde_json::from_slice(body).map_err(|e| {
        AppError::validation(
            "Invalid data provided",
            field_error(NON_FIELD_ERRORS, format!("JSON parse error - {}", e)),
        )
    })
}
