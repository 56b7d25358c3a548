use iqra_core::errors::AppError;
use iqra_models::profiles::{
    CreateStudentProfileDto, CreateTeacherProfileDto, StudentProfile, TeacherProfile,
};
use iqra_models::users::{UpdateProfileDto, User, UserProfile, UserType};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::modules::student_profiles::{self, service::StudentProfileService};
use crate::modules::teacher_profiles::{self, service::TeacherProfileService};
use crate::modules::users::service::UserService;

pub const ONLY_STUDENTS: &str = "Only students can create student profiles";
pub const ONLY_TEACHERS: &str = "Only teachers can create teacher profiles";

/// Operations a signed-in identity performs on itself.
pub struct ProfileService;

impl ProfileService {
    #[instrument(skip(db, user), fields(user_id = %user.id))]
    pub async fn get_profile(db: &PgPool, user: User) -> Result<UserProfile, AppError> {
        UserService::profile_for(db, user).await
    }

    #[instrument(skip(db, user, dto), fields(user_id = %user.id))]
    pub async fn update_profile(
        db: &PgPool,
        user: &User,
        dto: UpdateProfileDto,
    ) -> Result<UserProfile, AppError> {
        let updated = UserService::update_profile(db, user.id, dto).await?;
        info!("Profile updated");
        UserService::profile_for(db, updated).await
    }

    /// Role tag first (403), then the one-profile rule (400).
    #[instrument(skip(db, user), fields(user_id = %user.id))]
    pub async fn check_student_profile_allowed(db: &PgPool, user: &User) -> Result<(), AppError> {
        if user.user_type != UserType::Student {
            return Err(AppError::forbidden(ONLY_STUDENTS));
        }
        if StudentProfileService::find_by_user(db, user.id).await?.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                student_profiles::service::PROFILE_EXISTS
            )));
        }
        Ok(())
    }

    #[instrument(skip(db, user), fields(user_id = %user.id))]
    pub async fn check_teacher_profile_allowed(db: &PgPool, user: &User) -> Result<(), AppError> {
        if user.user_type != UserType::Teacher {
            return Err(AppError::forbidden(ONLY_TEACHERS));
        }
        if TeacherProfileService::find_by_user(db, user.id).await?.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                teacher_profiles::service::PROFILE_EXISTS
            )));
        }
        Ok(())
    }

    #[instrument(skip(db, user, dto), fields(user_id = %user.id))]
    pub async fn create_student_profile(
        db: &PgPool,
        user: &User,
        dto: CreateStudentProfileDto,
    ) -> Result<StudentProfile, AppError> {
        if user.user_type != UserType::Student {
            return Err(AppError::forbidden(ONLY_STUDENTS));
        }

        let profile = StudentProfileService::create(db, user.id, dto).await?;
        info!(profile_id = %profile.id, "Student profile created");
        Ok(profile)
    }

    #[instrument(skip(db, user, dto), fields(user_id = %user.id))]
    pub async fn create_teacher_profile(
        db: &PgPool,
        user: &User,
        dto: CreateTeacherProfileDto,
    ) -> Result<TeacherProfile, AppError> {
        if user.user_type != UserType::Teacher {
            return Err(AppError::forbidden(ONLY_TEACHERS));
        }

        let profile = TeacherProfileService::create(db, user.id, dto).await?;
        info!(profile_id = %profile.id, "Teacher profile created");
        Ok(profile)
    }
}
