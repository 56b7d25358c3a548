use axum::{Router, routing::post};

use super::controller::{google_auth, login, logout, register};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register/", post(register))
        .route("/login/", post(login))
        .route("/google/", post(google_auth))
        .route("/logout/", post(logout))
}
