use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_student_profile, create_teacher_profile, get_profile, update_profile,
};
use crate::state::AppState;

pub fn init_profile_router() -> Router<AppState> {
    Router::new()
        .route("/profile/", get(get_profile).put(update_profile))
        .route("/profile/student/", post(create_student_profile))
        .route("/profile/teacher/", post(create_teacher_profile))
}
