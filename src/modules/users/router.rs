use axum::{Router, http::Method, routing::get};
use iqra_core::permissions::{GovernedModel, HandlerAction, HandlerPolicy};

use super::controller::{list_users, partial_update_user, retrieve_user};
use crate::middleware::permission::PermissionGuard;
use crate::state::AppState;

pub fn collection_policy() -> HandlerPolicy {
    HandlerPolicy::new()
        .governs(GovernedModel::User)
        .action(Method::GET, HandlerAction::List)
}

pub fn item_policy() -> HandlerPolicy {
    HandlerPolicy::new()
        .governs(GovernedModel::User)
        .action(Method::GET, HandlerAction::Retrieve)
        .action(Method::PATCH, HandlerAction::PartialUpdate)
}

pub fn init_users_router(state: &AppState) -> Router<AppState> {
    let collection = PermissionGuard::new(state.clone(), collection_policy())
        .layer(Router::new().route("/users/", get(list_users)));

    let item = PermissionGuard::new(state.clone(), item_policy()).layer(
        Router::new().route("/users/{id}", get(retrieve_user).patch(partial_update_user)),
    );

    collection.merge(item)
}
