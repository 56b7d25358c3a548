//! Group-permission gate for administrative routes.
//!
//! Each guarded router is wrapped with a [`PermissionGuard`] carrying the
//! route's [`HandlerPolicy`]. The gate authenticates the caller, resolves the
//! codename the request needs and checks it against the caller's groups
//! before the handler runs. Anything it cannot resolve is denied.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Router,
    extract::{FromRequestParts, Request, State},
    middleware::{self, Next},
    response::Response,
};
use iqra_core::errors::AppError;
use iqra_core::permissions::{HandlerPolicy, has_group_permission, required_codename};
use tracing::{debug, warn};

use crate::middleware::auth::AuthUser;
use crate::modules::groups::service::GroupService;
use crate::state::AppState;

pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

#[derive(Clone, Debug)]
pub struct PermissionGuard {
    pub state: AppState,
    pub policy: Arc<HandlerPolicy>,
}

impl PermissionGuard {
    pub fn new(state: AppState, policy: HandlerPolicy) -> Self {
        Self {
            state,
            policy: Arc::new(policy),
        }
    }

    /// Gates every route of `router` behind this guard.
    pub fn layer(self, router: Router<AppState>) -> Router<AppState> {
        router.route_layer(middleware::from_fn_with_state(
            self,
            require_group_permission,
        ))
    }
}

pub async fn require_group_permission(
    State(guard): State<PermissionGuard>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &guard.state).await?;
    let user = auth_user.user();

    let required = required_codename(&guard.policy, &parts.method);

    let granted = if user.is_superuser {
        HashSet::new()
    } else {
        GroupService::get_user_permissions(&guard.state.db, user.id).await?
    };

    if !has_group_permission(user.is_superuser, required.as_deref(), &granted) {
        warn!(
            user_id = %user.id,
            method = %parts.method,
            required = required.as_deref().unwrap_or("<unresolved>"),
            "Permission denied"
        );
        return Err(AppError::forbidden(PERMISSION_DENIED));
    }

    debug!(user_id = %user.id, required = ?required, "Permission granted");

    Ok(next.run(Request::from_parts(parts, body)).await)
}
