//! Request and response bodies for the authentication endpoints.

use iqra_core::FailureMessage;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::profiles::{StudentProfileSummary, TeacherProfileSummary};
use crate::users::{UserProfile, UserType, validate_username};

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 150, message = "Ensure this field has no more than 150 characters."),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: Option<String>,
    #[validate(length(min = 8, message = "Ensure this field has at least 8 characters."))]
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default)]
    #[validate(length(max = 15, message = "Ensure this field has no more than 15 characters."))]
    pub phone: Option<String>,
}

impl FailureMessage for RegisterRequest {
    const FAILURE_MESSAGE: &'static str = "Registration failed";
}

/// Both fields default to empty so a missing one reaches the
/// "Must include username and password" check.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl FailureMessage for LoginRequest {
    const FAILURE_MESSAGE: &'static str = "Login failed";
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct GoogleAuthRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub access_token: String,
}

impl FailureMessage for GoogleAuthRequest {}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct GoogleAuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
    pub token: String,
    /// Whether this sign-in created the identity.
    pub is_new_user: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserProfile,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct StudentProfileCreatedResponse {
    pub success: bool,
    pub message: String,
    pub profile: StudentProfileSummary,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct TeacherProfileCreatedResponse {
    pub success: bool,
    pub message: String,
    pub profile: TeacherProfileSummary,
}
