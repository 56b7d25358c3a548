use axum::{Router, http::Method, routing::get};
use iqra_core::permissions::{GovernedModel, HandlerAction, HandlerPolicy};

use super::controller::{
    create_student_profile, destroy_student_profile, list_student_profiles,
    partial_update_student_profile, retrieve_student_profile, update_student_profile,
};
use crate::middleware::permission::PermissionGuard;
use crate::state::AppState;

pub fn collection_policy() -> HandlerPolicy {
    HandlerPolicy::new()
        .governs(GovernedModel::StudentProfile)
        .action(Method::GET, HandlerAction::List)
        .action(Method::POST, HandlerAction::Create)
}

pub fn item_policy() -> HandlerPolicy {
    HandlerPolicy::new()
        .governs(GovernedModel::StudentProfile)
        .action(Method::GET, HandlerAction::Retrieve)
        .action(Method::PUT, HandlerAction::Update)
        .action(Method::PATCH, HandlerAction::PartialUpdate)
        .action(Method::DELETE, HandlerAction::Destroy)
}

pub fn init_student_profiles_router(state: &AppState) -> Router<AppState> {
    let collection = PermissionGuard::new(state.clone(), collection_policy()).layer(
        Router::new().route(
            "/student-profiles/",
            get(list_student_profiles).post(create_student_profile),
        ),
    );

    let item = PermissionGuard::new(state.clone(), item_policy()).layer(
        Router::new().route(
            "/student-profiles/{id}",
            get(retrieve_student_profile)
                .put(update_student_profile)
                .patch(partial_update_student_profile)
                .delete(destroy_student_profile),
        ),
    );

    collection.merge(item)
}
