use axum::extract::State;
use iqra_core::errors::AppError;
use iqra_core::{ApiResponse, PaginationParams};
use iqra_models::groups::GroupWithPermissions;
use iqra_models::ids::GroupId;
use tracing::instrument;

use super::service::GroupService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ValidatedPath, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/groups/",
    params(PaginationParams),
    responses(
        (status = 200, description = "Groups with their permission codenames", body = Vec<GroupWithPermissions>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing view_group", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Groups"
)]
#[instrument(skip(state))]
pub async fn list_groups(
    State(state): State<AppState>,
    ValidatedQuery(pagination): ValidatedQuery<PaginationParams>,
) -> Result<ApiResponse<Vec<GroupWithPermissions>>, AppError> {
    let (groups, meta) = GroupService::list_groups(&state.db, &pagination).await?;
    Ok(ApiResponse::ok(groups)
        .message("Groups retrieved successfully")
        .meta(meta))
}

#[utoipa::path(
    get,
    path = "/api/groups/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "Group", body = GroupWithPermissions),
        (status = 403, description = "Missing view_group", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    ),
    tag = "Groups"
)]
#[instrument(skip(state))]
pub async fn retrieve_group(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<GroupId>,
) -> Result<ApiResponse<GroupWithPermissions>, AppError> {
    let group = GroupService::get_group(&state.db, id).await?;
    Ok(ApiResponse::ok(group).message("Group retrieved successfully"))
}
