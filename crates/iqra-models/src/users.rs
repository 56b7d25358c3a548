//! Identity models and DTOs.

use chrono::{DateTime, Utc};
use iqra_core::FailureMessage;
use iqra_core::serde::{deserialize_optional_bool, deserialize_optional_i64, deserialize_optional_string};
use iqra_core::PaginationParams;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::UserId;
use crate::profiles::{StudentProfile, StudentProfileSummary, TeacherProfile, TeacherProfileSummary};

pub const USERNAME_MAX_LENGTH: u64 = 150;
pub const PHONE_MAX_LENGTH: u64 = 15;

/// Role tag carried by every identity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Student,
    Teacher,
    Admin,
}

impl UserType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            "admin" => Ok(Self::Admin),
            other => Err(format!("\"{}\" is not a valid choice.", other)),
        }
    }
}

/// An identity row, without its password hash.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public shape of an identity, with its role profile embedded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub is_verified: bool,
    pub student_profile: Option<StudentProfileSummary>,
    pub teacher_profile: Option<TeacherProfileSummary>,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn from_parts(
        user: User,
        student: Option<StudentProfile>,
        teacher: Option<TeacherProfile>,
    ) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            user_type: user.user_type,
            phone: user.phone,
            avatar: user.avatar,
            is_verified: user.is_verified,
            student_profile: student.map(StudentProfileSummary::from),
            teacher_profile: teacher.map(TeacherProfileSummary::from),
            date_joined: user.date_joined,
            last_login: user.last_login,
        }
    }
}

/// Letters, digits and `@ . + - _` only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username").with_message(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .into(),
        ))
    }
}

/// Partial update of the caller's own identity. `is_verified` is not writable.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(
        length(min = 1, max = 150, message = "Ensure this field has no more than 150 characters."),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: Option<String>,
    pub user_type: Option<UserType>,
    #[validate(length(max = 15, message = "Ensure this field has no more than 15 characters."))]
    pub phone: Option<String>,
    #[validate(url(message = "Enter a valid URL."))]
    pub avatar: Option<String>,
}

impl FailureMessage for UpdateProfileDto {
    const FAILURE_MESSAGE: &'static str = "Profile update failed";
}

/// Fields an administrator may change on any identity.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct AdminUpdateUserDto {
    pub is_active: Option<bool>,
    pub is_verified: Option<bool>,
    pub user_type: Option<UserType>,
}

impl FailureMessage for AdminUpdateUserDto {}

/// Query parameters for the user listing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserFilterParams {
    #[serde(default)]
    pub user_type: Option<UserType>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_verified: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
    /// Matches username, email, first or last name.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl UserFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}
