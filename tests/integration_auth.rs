mod common;

use axum::http::StatusCode;
use common::{
    TEST_PASSWORD, count_users, create_test_user, deactivate, issue_token, send, setup_test_app,
    unique_username,
};
use serde_json::{Value, json};
use sqlx::PgPool;

fn register_body(username: &str, password: &str, confirm: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@iqra.test", username),
        "first_name": "Amina",
        "last_name": "Yusuf",
        "password": password,
        "confirm_password": confirm,
        "user_type": "student",
        "phone": "+2348012345678"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_success(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let username = unique_username("amina");

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register/",
        None,
        Some(register_body(&username, "strongpass1", "strongpass1")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["username"], username);
    assert_eq!(body["user"]["user_type"], "student");
    assert_eq!(body["user"]["is_verified"], false);
    assert!(body["user"]["student_profile"].is_null());
    assert!(body["user"].get("password").is_none());
    assert_eq!(body["token"].as_str().unwrap().len(), 40);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_password_mismatch_creates_nothing(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let before = count_users(&pool).await;

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register/",
        None,
        Some(register_body(&unique_username("amina"), "strongpass1", "strongpass2")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Registration failed");
    assert_eq!(
        body["errors"]["non_field_errors"][0],
        "Password and confirm password don't match"
    );
    assert_eq!(count_users(&pool).await, before);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_short_password(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register/",
        None,
        Some(register_body(&unique_username("amina"), "short", "short")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Registration failed");
    assert_eq!(
        body["errors"]["password"][0],
        "Ensure this field has at least 8 characters."
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_missing_field(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register/",
        None,
        Some(json!({
            "username": unique_username("amina"),
            "password": "strongpass1",
            "confirm_password": "strongpass1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Registration failed");
    assert_eq!(body["errors"]["email"][0], "This field is required.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_username_and_email(pool: PgPool) {
    let existing = create_test_user(&pool, "student").await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register/",
        None,
        Some(json!({
            "username": existing.username,
            "email": existing.email,
            "password": "strongpass1",
            "confirm_password": "strongpass1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["username"].is_array());
    assert!(body["errors"]["email"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success_reuses_token(pool: PgPool) {
    let user = create_test_user(&pool, "teacher").await;
    let existing = issue_token(&pool, user.id).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login/",
        None,
        Some(json!({ "username": user.username, "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["token"], existing);
    assert_eq!(body["user"]["user_type"], "teacher");
    assert!(!body["user"]["last_login"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login/",
        None,
        Some(json!({ "username": user.username, "password": "wrongpass" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Login failed");
    assert_eq!(body["errors"]["non_field_errors"][0], "Invalid credentials");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_missing_credentials(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login/",
        None,
        Some(json!({ "username": "amina" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["non_field_errors"][0],
        "Must include username and password"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_disabled_account_fails_with_any_password(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    deactivate(&pool, user.id).await;

    for password in [TEST_PASSWORD, "wrongpass"] {
        let app = setup_test_app(pool.clone());
        let (status, body) = send(
            app,
            "POST",
            "/api/auth/login/",
            None,
            Some(json!({ "username": user.username, "password": password })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Login failed");
        assert!(body.get("token").is_none());
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_revokes_token(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    let token = issue_token(&pool, user.id).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/logout/",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful");

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/profile/",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_requires_credentials(pool: PgPool) {
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/logout/",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication credentials were not provided.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_inactive_user_token_rejected(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    let token = issue_token(&pool, user.id).await;
    deactivate(&pool, user.id).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/profile/",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User inactive or deleted.");
}
