use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use iqra_auth::parse_authorization_header;
use iqra_core::errors::AppError;
use iqra_models::users::User;

use crate::modules::auth::service::AuthService;
use crate::state::AppState;

pub const CREDENTIALS_NOT_PROVIDED: &str = "Authentication credentials were not provided.";
pub const INVALID_TOKEN: &str = "Invalid token.";
pub const USER_INACTIVE: &str = "User inactive or deleted.";

/// The identity behind the request's access token.
///
/// Resolved once per request: a guard that has already authenticated the
/// caller leaves the user in the request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized(CREDENTIALS_NOT_PROVIDED))?;

        let key = parse_authorization_header(auth_header)
            .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN))?;

        let user = AuthService::user_for_token(&state.db, key)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN))?;

        if !user.is_active {
            return Err(AppError::unauthorized(USER_INACTIVE));
        }

        let auth_user = AuthUser(user);
        parts.extensions.insert(auth_user.clone());
        Ok(auth_user)
    }
}
