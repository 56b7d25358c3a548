use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::auth::router::init_auth_router;
use crate::modules::groups::router::init_groups_router;
use crate::modules::profile::router::init_profile_router;
use crate::modules::student_profiles::router::init_student_profiles_router;
use crate::modules::system::router::init_system_router;
use crate::modules::teacher_profiles::router::init_teacher_profiles_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

fn api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", init_auth_router())
        .merge(init_profile_router())
        .merge(init_system_router())
        .merge(init_student_profiles_router(state))
        .merge(init_teacher_profiles_router(state))
        .merge(init_users_router(state))
        .merge(init_groups_router(state))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api_router(&state))
        .layer(cors_layer(&state))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
}
