use axum::{Router, routing::get};

use super::controller::{health_check, project_info, test_get, test_post};
use crate::state::AppState;

pub fn init_system_router() -> Router<AppState> {
    Router::new()
        .route("/health/", get(health_check))
        .route("/info/", get(project_info))
        .route("/test/", get(test_get).post(test_post))
}
