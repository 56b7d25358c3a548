use axum::{Router, http::Method, routing::get};
use iqra_core::permissions::{GovernedModel, HandlerAction, HandlerPolicy};

use super::controller::{list_groups, retrieve_group};
use crate::middleware::permission::PermissionGuard;
use crate::state::AppState;

pub fn collection_policy() -> HandlerPolicy {
    HandlerPolicy::new()
        .governs(GovernedModel::Group)
        .action(Method::GET, HandlerAction::List)
}

pub fn item_policy() -> HandlerPolicy {
    HandlerPolicy::new()
        .governs(GovernedModel::Group)
        .action(Method::GET, HandlerAction::Retrieve)
}

pub fn init_groups_router(state: &AppState) -> Router<AppState> {
    let collection = PermissionGuard::new(state.clone(), collection_policy())
        .layer(Router::new().route("/groups/", get(list_groups)));

    let item = PermissionGuard::new(state.clone(), item_policy())
        .layer(Router::new().route("/groups/{id}", get(retrieve_group)));

    collection.merge(item)
}
