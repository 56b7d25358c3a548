use std::env;

pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Where Google access tokens are exchanged for profile information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthConfig {
    pub google_userinfo_url: String,
}

impl OAuthConfig {
    pub fn from_env() -> Self {
        Self {
            google_userinfo_url: env::var("GOOGLE_USERINFO_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| GOOGLE_USERINFO_URL.to_string()),
        }
    }
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            google_userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }
}
