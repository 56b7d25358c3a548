mod common;

use axum::http::StatusCode;
use common::{create_student_profile, create_test_user, issue_token, send, setup_test_app};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_get_profile(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    let token = issue_token(&pool, user.id).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/profile/",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body.get("message").is_none());
    assert_eq!(body["user"]["username"], user.username);
    assert!(body["user"]["student_profile"].is_null());
    assert!(body["user"]["teacher_profile"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_profile_accepts_bearer_scheme(pool: PgPool) {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let user = create_test_user(&pool, "student").await;
    let token = issue_token(&pool, user.id).await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/profile/")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = setup_test_app(pool.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_profile_partial_fields(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    let token = issue_token(&pool, user.id).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        "/api/profile/",
        Some(&token),
        Some(json!({ "first_name": "Amina", "phone": "+2348000000000" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["user"]["first_name"], "Amina");
    assert_eq!(body["user"]["last_name"], "User");
    assert_eq!(body["user"]["phone"], "+2348000000000");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_profile_email_taken(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    let other = create_test_user(&pool, "student").await;
    let token = issue_token(&pool, user.id).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        "/api/profile/",
        Some(&token),
        Some(json!({ "email": other.email })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Profile update failed");
    assert!(body["errors"]["email"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_profile_once(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    let token = issue_token(&pool, user.id).await;
    let payload = json!({ "student_id": "STU-0001", "grade": "Year 1", "major": "Physics" });

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/profile/student/",
        Some(&token),
        Some(payload.clone()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Student profile created successfully");
    assert_eq!(body["profile"]["student_id"], "STU-0001");
    assert_eq!(body["profile"]["major"], "Physics");

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/profile/student/",
        Some(&token),
        Some(json!({ "student_id": "STU-0002" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Student profile already exists");

    let (_, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/profile/",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["user"]["student_profile"]["student_id"], "STU-0001");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_profile_as_teacher_forbidden(pool: PgPool) {
    let user = create_test_user(&pool, "teacher").await;
    let token = issue_token(&pool, user.id).await;

    // The role check runs before the (invalid) body is looked at.
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/profile/student/",
        Some(&token),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Only students can create student profiles");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_profile_existing_checked_before_body(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    create_student_profile(&pool, user.id, "STU-0100").await;
    let token = issue_token(&pool, user.id).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/profile/student/",
        Some(&token),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Student profile already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_profile_invalid_body(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    let token = issue_token(&pool, user.id).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/profile/student/",
        Some(&token),
        Some(json!({ "student_id": "S".repeat(21) })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Profile creation failed");
    assert!(body["errors"]["student_id"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_profile_duplicate_student_id(pool: PgPool) {
    let owner = create_test_user(&pool, "student").await;
    create_student_profile(&pool, owner.id, "STU-0200").await;
    let user = create_test_user(&pool, "student").await;
    let token = issue_token(&pool, user.id).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/profile/student/",
        Some(&token),
        Some(json!({ "student_id": "STU-0200" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["student_id"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_profile(pool: PgPool) {
    let user = create_test_user(&pool, "teacher").await;
    let token = issue_token(&pool, user.id).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/profile/teacher/",
        Some(&token),
        Some(json!({
            "employee_id": "EMP-7",
            "department": "Sciences",
            "specialization": "Organic Chemistry",
            "hire_date": "2024-09-01"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Teacher profile created successfully");
    assert_eq!(body["profile"]["employee_id"], "EMP-7");
    assert_eq!(body["profile"]["hire_date"], "2024-09-01");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_profile_as_student_forbidden(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    let token = issue_token(&pool, user.id).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/profile/teacher/",
        Some(&token),
        Some(json!({ "employee_id": "EMP-8" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Only teachers can create teacher profiles");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_profile_requires_token(pool: PgPool) {
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/profile/",
        Some("0000000000000000000000000000000000000000"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_profile_blank_id(pool: PgPool) {
    let user = create_test_user(&pool, "student").await;
    let token = issue_token(&pool, user.id).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/profile/student/",
        Some(&token),
        Some(json!({ "student_id": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"]["student_id"][0], "This field may not be blank.");
}
