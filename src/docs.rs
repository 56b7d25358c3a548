use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use iqra_core::{PaginationMeta, PaginationParams};
use iqra_models::auth::{
    AuthResponse, GoogleAuthRequest, GoogleAuthResponse, LoginRequest, MessageResponse,
    ProfileResponse, RegisterRequest, StudentProfileCreatedResponse, TeacherProfileCreatedResponse,
};
use iqra_models::groups::{Group, GroupWithPermissions, Permission};
use iqra_models::profiles::{
    CreateStudentProfileDto, CreateTeacherProfileDto, StudentProfile, StudentProfileRecord,
    StudentProfileSummary, TeacherProfile, TeacherProfileRecord, TeacherProfileSummary,
    UpdateStudentProfileDto, UpdateTeacherProfileDto,
};
use iqra_models::users::{AdminUpdateUserDto, UpdateProfileDto, User, UserProfile, UserType};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::system::controller::{
    HealthResponse, ProjectInfoResponse, TestGetResponse, TestPostResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::google_auth,
        crate::modules::auth::controller::logout,
        crate::modules::profile::controller::get_profile,
        crate::modules::profile::controller::update_profile,
        crate::modules::profile::controller::create_student_profile,
        crate::modules::profile::controller::create_teacher_profile,
        crate::modules::student_profiles::controller::list_student_profiles,
        crate::modules::student_profiles::controller::create_student_profile,
        crate::modules::student_profiles::controller::retrieve_student_profile,
        crate::modules::student_profiles::controller::update_student_profile,
        crate::modules::student_profiles::controller::partial_update_student_profile,
        crate::modules::student_profiles::controller::destroy_student_profile,
        crate::modules::teacher_profiles::controller::list_teacher_profiles,
        crate::modules::teacher_profiles::controller::create_teacher_profile,
        crate::modules::teacher_profiles::controller::retrieve_teacher_profile,
        crate::modules::teacher_profiles::controller::update_teacher_profile,
        crate::modules::teacher_profiles::controller::partial_update_teacher_profile,
        crate::modules::teacher_profiles::controller::destroy_teacher_profile,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::retrieve_user,
        crate::modules::users::controller::partial_update_user,
        crate::modules::groups::controller::list_groups,
        crate::modules::groups::controller::retrieve_group,
        crate::modules::system::controller::health_check,
        crate::modules::system::controller::project_info,
        crate::modules::system::controller::test_get,
        crate::modules::system::controller::test_post,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            GoogleAuthRequest,
            AuthResponse,
            GoogleAuthResponse,
            MessageResponse,
            ProfileResponse,
            StudentProfileCreatedResponse,
            TeacherProfileCreatedResponse,
            User,
            UserType,
            UserProfile,
            UpdateProfileDto,
            AdminUpdateUserDto,
            StudentProfile,
            StudentProfileSummary,
            StudentProfileRecord,
            CreateStudentProfileDto,
            UpdateStudentProfileDto,
            TeacherProfile,
            TeacherProfileSummary,
            TeacherProfileRecord,
            CreateTeacherProfileDto,
            UpdateTeacherProfileDto,
            Group,
            Permission,
            GroupWithPermissions,
            PaginationMeta,
            PaginationParams,
            HealthResponse,
            ProjectInfoResponse,
            TestGetResponse,
            TestPostResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, Google sign-in and logout"),
        (name = "Profile", description = "The caller's own account and profiles"),
        (name = "Student Profiles", description = "Student profile administration"),
        (name = "Teacher Profiles", description = "Teacher profile administration"),
        (name = "Users", description = "Account administration"),
        (name = "Groups", description = "Permission groups"),
        (name = "System", description = "Health and project information")
    ),
    info(
        title = "IQRA API",
        version = "1.0.0",
        description = "User management backend for the IQRA student e-learning platform.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            // Value is `Token <key>`.
            components.add_security_scheme(
                "token_auth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            )
        }
    }
}
