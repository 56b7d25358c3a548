use axum::{Router, http::Method, routing::get};
use iqra_core::permissions::{GovernedModel, HandlerAction, HandlerPolicy};

use super::controller::{
    create_teacher_profile, destroy_teacher_profile, list_teacher_profiles,
    partial_update_teacher_profile, retrieve_teacher_profile, update_teacher_profile,
};
use crate::middleware::permission::PermissionGuard;
use crate::state::AppState;

pub fn collection_policy() -> HandlerPolicy {
    HandlerPolicy::new()
        .governs(GovernedModel::TeacherProfile)
        .action(Method::GET, HandlerAction::List)
        .action(Method::POST, HandlerAction::Create)
}

pub fn item_policy() -> HandlerPolicy {
    HandlerPolicy::new()
        .governs(GovernedModel::TeacherProfile)
        .action(Method::GET, HandlerAction::Retrieve)
        .action(Method::PUT, HandlerAction::Update)
        .action(Method::PATCH, HandlerAction::PartialUpdate)
        .action(Method::DELETE, HandlerAction::Destroy)
}

pub fn init_teacher_profiles_router(state: &AppState) -> Router<AppState> {
    let collection = PermissionGuard::new(state.clone(), collection_policy()).layer(
        Router::new().route(
            "/teacher-profiles/",
            get(list_teacher_profiles).post(create_teacher_profile),
        ),
    );

    let item = PermissionGuard::new(state.clone(), item_policy()).layer(
        Router::new().route(
            "/teacher-profiles/{id}",
            get(retrieve_teacher_profile)
                .put(update_teacher_profile)
                .patch(partial_update_teacher_profile)
                .delete(destroy_teacher_profile),
        ),
    );

    collection.merge(item)
}
