//! Google sign-in.
//!
//! The client exchanges an OAuth access token for the caller's Google profile
//! by calling the v2 userinfo endpoint. A transport failure and a rejected
//! token are reported separately; a rejected token covers both a non-200
//! response and a 200 whose body carries an `error` key.

use std::fmt::Debug;

use async_trait::async_trait;
use iqra_config::OAuthConfig;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleUserInfo {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityProviderError {
    #[error("Unable to validate token with Google")]
    Unreachable(#[source] reqwest::Error),
    #[error("Invalid access token")]
    InvalidToken,
    #[error("Google profile is missing required fields")]
    MalformedProfile(#[source] serde_json::Error),
}

/// Resolves an OAuth access token to the profile of the account it belongs to.
#[async_trait]
pub trait IdentityProvider: Send + Sync + Debug {
    async fn fetch_user_info(
        &self,
        access_token: &str,
    ) -> Result<GoogleUserInfo, IdentityProviderError>;
}

#[derive(Debug, Clone)]
pub struct GoogleIdentityProvider {
    http_client: reqwest::Client,
    userinfo_url: String,
}

impl GoogleIdentityProvider {
    pub fn new(config: &OAuthConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            userinfo_url: config.google_userinfo_url.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    #[instrument(skip(self, access_token))]
    async fn fetch_user_info(
        &self,
        access_token: &str,
    ) -> Result<GoogleUserInfo, IdentityProviderError> {
        let response = self
            .http_client
            .get(&self.userinfo_url)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Google userinfo request failed");
                IdentityProviderError::Unreachable(e)
            })?;

        if response.status() != reqwest::StatusCode::OK {
            warn!(status = %response.status(), "Google rejected access token");
            return Err(IdentityProviderError::InvalidToken);
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|_| IdentityProviderError::InvalidToken)?;

        interpret_userinfo(payload)
    }
}

/// Turns a 200 userinfo body into a profile.
pub fn interpret_userinfo(payload: Value) -> Result<GoogleUserInfo, IdentityProviderError> {
    if payload.get("error").is_some() {
        return Err(IdentityProviderError::InvalidToken);
    }

    serde_json::from_value(payload).map_err(IdentityProviderError::MalformedProfile)
}
