use std::sync::Arc;

use iqra_auth::{GoogleIdentityProvider, IdentityProvider};
use iqra_config::{CorsConfig, OAuthConfig};
use iqra_db::init_db_pool;
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub cors_config: CorsConfig,
    pub oauth_config: OAuthConfig,
    pub identity_provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// State backed by the real Google userinfo endpoint.
    pub fn new(db: PgPool, cors_config: CorsConfig, oauth_config: OAuthConfig) -> Self {
        let identity_provider = Arc::new(GoogleIdentityProvider::new(&oauth_config));
        Self {
            db,
            cors_config,
            oauth_config,
            identity_provider,
        }
    }

    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = provider;
        self
    }
}

pub async fn init_app_state() -> AppState {
    AppState::new(
        init_db_pool().await,
        CorsConfig::from_env(),
        OAuthConfig::from_env(),
    )
}
