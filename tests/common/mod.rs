#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use iqra::router::init_router;
use iqra::state::AppState;
use iqra_auth::{GoogleUserInfo, IdentityProvider, IdentityProviderError, generate_token_key};
use iqra_config::{CorsConfig, OAuthConfig};
use iqra_core::hash_password;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

/// Answers Google userinfo lookups from a fixed table instead of the network.
#[derive(Debug, Default)]
pub struct StubIdentityProvider {
    pub accounts: Vec<(String, GoogleUserInfo)>,
}

impl StubIdentityProvider {
    pub fn with_account(mut self, access_token: &str, info: GoogleUserInfo) -> Self {
        self.accounts.push((access_token.to_string(), info));
        self
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn fetch_user_info(
        &self,
        access_token: &str,
    ) -> Result<GoogleUserInfo, IdentityProviderError> {
        self.accounts
            .iter()
            .find(|(token, _)| token == access_token)
            .map(|(_, info)| info.clone())
            .ok_or(IdentityProviderError::InvalidToken)
    }
}

pub fn google_user(email: &str) -> GoogleUserInfo {
    GoogleUserInfo {
        id: Some("1234567890".to_string()),
        email: email.to_string(),
        verified_email: true,
        given_name: Some("Amina".to_string()),
        family_name: Some("Yusuf".to_string()),
        picture: Some("https://lh3.googleusercontent.com/a/photo.jpg".to_string()),
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    AppState::new(
        pool,
        CorsConfig::parse("http://localhost:3000"),
        OAuthConfig::default(),
    )
}

pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool))
}

/// Real Google provider pointed at a closed local port.
pub fn setup_test_app_with_unreachable_provider(pool: PgPool) -> Router {
    let oauth_config = OAuthConfig {
        google_userinfo_url: "http://127.0.0.1:9/userinfo".to_string(),
    };
    init_router(AppState::new(
        pool,
        CorsConfig::parse("http://localhost:3000"),
        oauth_config,
    ))
}

pub fn setup_test_app_with_provider(pool: PgPool, provider: StubIdentityProvider) -> Router {
    init_router(test_state(pool).with_identity_provider(Arc::new(provider)))
}

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
}

pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

/// Inserts an active identity with `TEST_PASSWORD`.
pub async fn create_test_user(pool: &PgPool, user_type: &str) -> TestUser {
    create_named_user(pool, &unique_username(user_type), user_type).await
}

pub async fn create_named_user(pool: &PgPool, username: &str, user_type: &str) -> TestUser {
    let username = username.to_string();
    let email = format!("{}@iqra.test", username);
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO users (username, email, password, first_name, last_name, user_type)
           VALUES ($1, $2, $3, 'Test', 'User', $4::user_type)
           RETURNING id"#,
    )
    .bind(&username)
    .bind(&email)
    .bind(&hashed)
    .bind(user_type)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username,
        email,
        password: TEST_PASSWORD.to_string(),
    }
}

pub async fn create_superuser(pool: &PgPool) -> TestUser {
    let user = create_test_user(pool, "admin").await;
    sqlx::query("UPDATE users SET is_superuser = TRUE, is_staff = TRUE WHERE id = $1")
        .bind(user.id)
        .execute(pool)
        .await
        .unwrap();
    user
}

pub async fn deactivate(pool: &PgPool, user_id: Uuid) {
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

/// Issues a token directly, bypassing login.
pub async fn issue_token(pool: &PgPool, user_id: Uuid) -> String {
    let key = generate_token_key();
    sqlx::query("INSERT INTO auth_tokens (key, user_id) VALUES ($1, $2)")
        .bind(&key)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
    key
}

/// Creates a group granting `codenames` and puts the user in it.
pub async fn grant(pool: &PgPool, user_id: Uuid, codenames: &[&str]) -> Uuid {
    let group_id = sqlx::query_scalar::<_, Uuid>("INSERT INTO groups (name) VALUES ($1) RETURNING id")
        .bind(unique_username("group"))
        .fetch_one(pool)
        .await
        .unwrap();

    for codename in codenames {
        sqlx::query(
            r#"INSERT INTO group_permissions (group_id, permission_id)
               SELECT $1, id FROM permissions WHERE codename = $2"#,
        )
        .bind(group_id)
        .bind(codename)
        .execute(pool)
        .await
        .unwrap();
    }

    sqlx::query("INSERT INTO user_groups (user_id, group_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(group_id)
        .execute(pool)
        .await
        .unwrap();

    group_id
}

pub async fn create_student_profile(pool: &PgPool, user_id: Uuid, student_id: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO student_profiles (user_id, student_id, grade, major)
           VALUES ($1, $2, 'Year 2', 'Mathematics')
           RETURNING id"#,
    )
    .bind(user_id)
    .bind(student_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn count_users(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Sends a request and returns the status with the decoded JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Token {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
