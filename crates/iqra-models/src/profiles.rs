//! Student and teacher profiles.
//!
//! An identity has at most one profile of each kind. The self-service
//! endpoints return the compact `*Summary` shape; the administrative
//! resources return `*Record`, which also carries ids and the owner's
//! username.

use chrono::{DateTime, NaiveDate, Utc};
use iqra_core::FailureMessage;
use iqra_core::PaginationParams;
use iqra_core::serde::{deserialize_optional_i64, deserialize_optional_string};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::{StudentProfileId, TeacherProfileId, UserId};

/// Student and employee ids: non-blank, at most 20 characters.
pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("This field may not be blank.".into()));
    }
    if value.chars().count() > 20 {
        return Err(ValidationError::new("max_length")
            .with_message("Ensure this field has no more than 20 characters.".into()));
    }
    Ok(())
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct StudentProfile {
    pub id: StudentProfileId,
    pub user_id: UserId,
    pub student_id: String,
    pub grade: String,
    pub major: String,
    pub enrollment_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct StudentProfileSummary {
    pub student_id: String,
    pub grade: String,
    pub major: String,
    pub enrollment_date: Option<NaiveDate>,
}

impl From<StudentProfile> for StudentProfileSummary {
    fn from(profile: StudentProfile) -> Self {
        Self {
            student_id: profile.student_id,
            grade: profile.grade,
            major: profile.major,
            enrollment_date: profile.enrollment_date,
        }
    }
}

/// A student profile joined with its owner, as listed by administrators.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct StudentProfileRecord {
    pub id: StudentProfileId,
    pub user_id: UserId,
    pub username: String,
    pub student_id: String,
    pub grade: String,
    pub major: String,
    pub enrollment_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating a student profile.
///
/// `user_id` is only read by the administrative endpoint; the self-service
/// endpoint always creates the profile for the caller.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct CreateStudentProfileDto {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[validate(custom(function = "validate_identifier"))]
    pub student_id: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub grade: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub major: Option<String>,
    #[serde(default)]
    pub enrollment_date: Option<NaiveDate>,
}

impl FailureMessage for CreateStudentProfileDto {
    const FAILURE_MESSAGE: &'static str = "Profile creation failed";
}

/// Body for `PUT`/`PATCH` on a student profile. `PUT` requires `student_id`.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateStudentProfileDto {
    #[validate(custom(function = "validate_identifier"))]
    pub student_id: Option<String>,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub grade: Option<String>,
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub major: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
}

impl FailureMessage for UpdateStudentProfileDto {}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StudentProfileFilterParams {
    /// Matches username, student id, grade or major.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub major: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl StudentProfileFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TeacherProfile {
    pub id: TeacherProfileId,
    pub user_id: UserId,
    pub employee_id: String,
    pub department: String,
    pub specialization: String,
    pub hire_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TeacherProfileSummary {
    pub employee_id: String,
    pub department: String,
    pub specialization: String,
    pub hire_date: Option<NaiveDate>,
}

impl From<TeacherProfile> for TeacherProfileSummary {
    fn from(profile: TeacherProfile) -> Self {
        Self {
            employee_id: profile.employee_id,
            department: profile.department,
            specialization: profile.specialization,
            hire_date: profile.hire_date,
        }
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TeacherProfileRecord {
    pub id: TeacherProfileId,
    pub user_id: UserId,
    pub username: String,
    pub employee_id: String,
    pub department: String,
    pub specialization: String,
    pub hire_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct CreateTeacherProfileDto {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[validate(custom(function = "validate_identifier"))]
    pub employee_id: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub department: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200, message = "Ensure this field has no more than 200 characters."))]
    pub specialization: Option<String>,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
}

impl FailureMessage for CreateTeacherProfileDto {
    const FAILURE_MESSAGE: &'static str = "Profile creation failed";
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateTeacherProfileDto {
    #[validate(custom(function = "validate_identifier"))]
    pub employee_id: Option<String>,
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub department: Option<String>,
    #[validate(length(max = 200, message = "Ensure this field has no more than 200 characters."))]
    pub specialization: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

impl FailureMessage for UpdateTeacherProfileDto {}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TeacherProfileFilterParams {
    /// Matches username, employee id, department or specialization.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl TeacherProfileFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_id_length_limit() {
        let dto = CreateStudentProfileDto {
            student_id: "S".repeat(21),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(
            errors.field_errors()["student_id"][0].message.as_deref(),
            Some("Ensure this field has no more than 20 characters.")
        );
    }

    #[test]
    fn test_blank_ids_are_rejected() {
        let dto = CreateStudentProfileDto {
            student_id: String::new(),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(
            errors.field_errors()["student_id"][0].message.as_deref(),
            Some("This field may not be blank.")
        );

        let dto = UpdateTeacherProfileDto {
            employee_id: Some("   ".to_string()),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(
            errors.field_errors()["employee_id"][0].message.as_deref(),
            Some("This field may not be blank.")
        );
    }

    #[test]
    fn test_identifier_at_limit_is_accepted() {
        assert!(validate_identifier(&"E".repeat(20)).is_ok());
    }

    #[test]
    fn test_create_student_profile_minimal_body() {
        let dto: CreateStudentProfileDto =
            serde_json::from_str(r#"{"student_id":"STU-001"}"#).unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.user_id.is_none());
        assert!(dto.grade.is_none());
    }

    #[test]
    fn test_teacher_specialization_limit() {
        let dto = CreateTeacherProfileDto {
            employee_id: "EMP-1".to_string(),
            specialization: Some("x".repeat(201)),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_summary_drops_ids() {
        let profile = TeacherProfile {
            id: TeacherProfileId::new(),
            user_id: UserId::new(),
            employee_id: "EMP-9".to_string(),
            department: "Physics".to_string(),
            specialization: "Optics".to_string(),
            hire_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let summary = TeacherProfileSummary::from(profile);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["employee_id"], "EMP-9");
        assert!(json.get("id").is_none());
    }
}
