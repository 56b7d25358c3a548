//! # IQRA Models
//!
//! Domain models and DTOs for the IQRA backend.
//!
//! - [`auth`]: registration, login, Google sign-in and their responses
//! - [`groups`]: groups and permission codenames
//! - [`ids`]: typed UUID wrappers
//! - [`profiles`]: student and teacher profiles
//! - [`users`]: identities, role tags and profile updates

pub mod auth;
pub mod groups;
pub mod ids;
pub mod profiles;
pub mod users;

pub use auth::{
    AuthResponse, GoogleAuthRequest, GoogleAuthResponse, LoginRequest, MessageResponse,
    ProfileResponse, RegisterRequest, StudentProfileCreatedResponse, TeacherProfileCreatedResponse,
};
pub use groups::{Group, GroupWithPermissions, Permission};
pub use ids::{GroupId, PermissionId, StudentProfileId, TeacherProfileId, UserId};
pub use profiles::{
    CreateStudentProfileDto, CreateTeacherProfileDto, StudentProfile, StudentProfileFilterParams,
    StudentProfileRecord, StudentProfileSummary, TeacherProfile, TeacherProfileFilterParams,
    TeacherProfileRecord, TeacherProfileSummary, UpdateStudentProfileDto, UpdateTeacherProfileDto,
};
pub use users::{AdminUpdateUserDto, UpdateProfileDto, User, UserFilterParams, UserProfile, UserType};
