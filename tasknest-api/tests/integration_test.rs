/// Integration tests for the Tasknest API
///
/// These tests verify the full system works end-to-end against a live
/// PostgreSQL database:
/// - Registration and login
/// - Task CRUD with the per-owner title uniqueness invariant
/// - Ownership enforcement (foreign tasks/categories yield 403, unchanged)
/// - The restricted category selector on task create/update
/// - Category deletion leaving member tasks intact
/// - Derived listings and the structured export
///
/// They require `DATABASE_URL` and `JWT_SECRET` to be set and are ignored by
/// default; run them with `cargo test -- --ignored`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{assert_status, body_json, TestContext};
use serde_json::json;

fn task_body(title: &str, deadline: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "",
        "priority": "urgent_important",
        "deadline": deadline,
    })
}

/// Test that registration creates a usable account
#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL and JWT_SECRET)"]
async fn test_register_and_login() {
    let ctx = TestContext::new().await.unwrap();

    let username = format!("carol-{}", uuid::Uuid::new_v4());
    let response = ctx
        .send(
            Request::builder()
                .method("POST")
                .uri("/v1/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "username": username,
                        "email": format!("{}@example.com", username),
                        "password": "SecureP4ss",
                        "age": 28
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;

    let body = assert_status(response, StatusCode::OK).await;
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    let user_id = body["user_id"].as_str().unwrap().to_string();

    // Login with the same credentials
    let response = ctx
        .send(
            Request::builder()
                .method("POST")
                .uri("/v1/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "username": username, "password": "SecureP4ss" }).to_string(),
                ))
                .unwrap(),
        )
        .await;

    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["user_id"], user_id);

    // The minted token reaches guarded routes
    let token = body["access_token"].as_str().unwrap();
    let response = ctx
        .send_empty("GET", "/v1/me", &format!("Bearer {}", token))
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["username"], username);

    // Registered user is left behind deliberately small; clean it up
    let uid = uuid::Uuid::parse_str(&user_id).unwrap();
    tasknest_shared::models::user::User::delete(&ctx.db, uid)
        .await
        .unwrap();

    ctx.cleanup().await.unwrap();
}

/// Test that unauthenticated access to guarded routes is rejected
#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL and JWT_SECRET)"]
async fn test_authentication_required() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/tasks")
        .body(Body::empty())
        .unwrap();

    let response = ctx.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// Test task creation and the per-owner title uniqueness invariant
#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL and JWT_SECRET)"]
async fn test_task_title_unique_per_owner() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .send_json(
            "POST",
            "/v1/tasks",
            &ctx.auth_header(),
            task_body("Report", "2030-01-01T00:00:00Z"),
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    // Same (title, owner): validation failure
    let response = ctx
        .send_json(
            "POST",
            "/v1/tasks",
            &ctx.auth_header(),
            task_body("Report", "2030-06-01T00:00:00Z"),
        )
        .await;
    assert_status(response, StatusCode::CONFLICT).await;

    // Same title under a different owner: fine
    let response = ctx
        .send_json(
            "POST",
            "/v1/tasks",
            &ctx.other_auth_header(),
            task_body("Report", "2030-01-01T00:00:00Z"),
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    ctx.cleanup().await.unwrap();
}

/// Test that editing or deleting another user's task is forbidden and
/// leaves the task unchanged
#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL and JWT_SECRET)"]
async fn test_ownership_enforced_on_tasks() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .send_json(
            "POST",
            "/v1/tasks",
            &ctx.auth_header(),
            task_body("Private task", "2030-01-01T00:00:00Z"),
        )
        .await;
    let created = assert_status(response, StatusCode::OK).await;
    let task_id = created["id"].as_str().unwrap().to_string();

    // Detail is also owner-only
    let response = ctx
        .send_empty(
            "GET",
            &format!("/v1/tasks/{}", task_id),
            &ctx.other_auth_header(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Foreign edit: forbidden
    let response = ctx
        .send_json(
            "PUT",
            &format!("/v1/tasks/{}", task_id),
            &ctx.other_auth_header(),
            json!({
                "title": "Hijacked",
                "description": "",
                "priority": "not_urgent_unimportant",
                "deadline": "2031-01-01T00:00:00Z",
                "status": "done",
                "category_ids": []
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Foreign delete: forbidden
    let response = ctx
        .send_empty(
            "DELETE",
            &format!("/v1/tasks/{}", task_id),
            &ctx.other_auth_header(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The task is unchanged and still owned by the creator
    let response = ctx
        .send_empty("GET", &format!("/v1/tasks/{}", task_id), &ctx.auth_header())
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["title"], "Private task");
    assert_eq!(body["status"], "incomplete");

    ctx.cleanup().await.unwrap();
}

/// Test that the category selector only accepts the submitter's categories
#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL and JWT_SECRET)"]
async fn test_category_selector_restricted_to_owner() {
    let ctx = TestContext::new().await.unwrap();

    // First user owns a category
    let response = ctx
        .send_json(
            "POST",
            "/v1/categories",
            &ctx.auth_header(),
            json!({ "name": "Work" }),
        )
        .await;
    let category = assert_status(response, StatusCode::OK).await;
    let category_id = category["id"].as_str().unwrap().to_string();

    // Second user cannot attach it, even knowing its id
    let mut body = task_body("Sneaky", "2030-01-01T00:00:00Z");
    body["category_ids"] = json!([category_id]);

    let response = ctx
        .send_json("POST", "/v1/tasks", &ctx.other_auth_header(), body.clone())
        .await;
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY).await;

    // The owner can
    body["title"] = json!("Legit");
    let response = ctx
        .send_json("POST", "/v1/tasks", &ctx.auth_header(), body)
        .await;
    assert_status(response, StatusCode::OK).await;

    ctx.cleanup().await.unwrap();
}

/// Test that deleting a category detaches but does not delete its tasks
#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL and JWT_SECRET)"]
async fn test_category_delete_keeps_tasks() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .send_json(
            "POST",
            "/v1/categories",
            &ctx.auth_header(),
            json!({ "name": "Doomed" }),
        )
        .await;
    let category = assert_status(response, StatusCode::OK).await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let mut body = task_body("Survivor", "2030-01-01T00:00:00Z");
    body["category_ids"] = json!([category_id]);
    let response = ctx
        .send_json("POST", "/v1/tasks", &ctx.auth_header(), body)
        .await;
    let task = assert_status(response, StatusCode::OK).await;
    let task_id = task["id"].as_str().unwrap().to_string();

    // Delete the category
    let response = ctx
        .send_empty(
            "DELETE",
            &format!("/v1/categories/{}", category_id),
            &ctx.auth_header(),
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    // The task survives with an empty category set
    let response = ctx
        .send_empty("GET", &format!("/v1/tasks/{}", task_id), &ctx.auth_header())
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["title"], "Survivor");
    assert_eq!(body["categories"].as_array().unwrap().len(), 0);

    ctx.cleanup().await.unwrap();
}

/// Test the derived listings: overdue/upcoming on the task list,
/// completed/pending on the category detail
#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL and JWT_SECRET)"]
async fn test_derived_listings() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .send_json(
            "POST",
            "/v1/categories",
            &ctx.auth_header(),
            json!({ "name": "Work" }),
        )
        .await;
    let category = assert_status(response, StatusCode::OK).await;
    let category_id = category["id"].as_str().unwrap().to_string();

    // One task far in the past, one far in the future, both in the category
    let mut past = task_body("Report", "2024-01-01T00:00:00Z");
    past["category_ids"] = json!([category_id]);
    let response = ctx
        .send_json("POST", "/v1/tasks", &ctx.auth_header(), past)
        .await;
    let report = assert_status(response, StatusCode::OK).await;
    let report_id = report["id"].as_str().unwrap().to_string();

    let mut future = task_body("Plan offsite", "2099-01-01T00:00:00Z");
    future["category_ids"] = json!([category_id]);
    let response = ctx
        .send_json("POST", "/v1/tasks", &ctx.auth_header(), future)
        .await;
    assert_status(response, StatusCode::OK).await;

    // Listing: ordered by deadline, partitioned around now
    let response = ctx.send_empty("GET", "/v1/tasks", &ctx.auth_header()).await;
    let body = assert_status(response, StatusCode::OK).await;

    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "Report"); // earliest deadline first

    let overdue = body["overdue"].as_array().unwrap();
    let upcoming = body["upcoming"].as_array().unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(upcoming.len(), 1);
    assert_eq!(overdue[0]["title"], "Report");
    assert_eq!(upcoming[0]["title"], "Plan offsite");

    // Mark the report done, then check the category partition
    let response = ctx
        .send_json(
            "PUT",
            &format!("/v1/tasks/{}", report_id),
            &ctx.auth_header(),
            json!({
                "title": "Report",
                "description": "",
                "priority": "urgent_important",
                "deadline": "2024-01-01T00:00:00Z",
                "status": "done",
                "category_ids": [category_id]
            }),
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    let response = ctx
        .send_empty(
            "GET",
            &format!("/v1/categories/{}", category_id),
            &ctx.auth_header(),
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;

    let completed = body["completed"].as_array().unwrap();
    let pending = body["pending"].as_array().unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["title"], "Report");
    assert!(pending.iter().all(|t| t["title"] != "Report"));

    ctx.cleanup().await.unwrap();
}

/// Test the structured listing export
#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL and JWT_SECRET)"]
async fn test_export_tasks() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .send_json(
            "POST",
            "/v1/tasks",
            &ctx.auth_header(),
            task_body("Exported", "2030-01-01T00:00:00Z"),
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    // Another user's tasks must not appear in the export
    let response = ctx
        .send_json(
            "POST",
            "/v1/tasks",
            &ctx.other_auth_header(),
            task_body("Foreign", "2030-01-01T00:00:00Z"),
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    let response = ctx
        .send_empty("GET", "/v1/tasks/export", &ctx.auth_header())
        .await;
    let body = assert_status(response, StatusCode::OK).await;

    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["title"], "Exported");
    assert_eq!(record["status"], "incomplete");
    assert_eq!(record["priority"], "urgent_important");
    assert!(record["id"].is_string());
    assert!(record["categories"].is_array());
    assert!(record["deadline"].is_string());

    ctx.cleanup().await.unwrap();
}

/// Test duplicate category name for the same owner vs a different owner
#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL and JWT_SECRET)"]
async fn test_category_name_unique_per_owner() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .send_json(
            "POST",
            "/v1/categories",
            &ctx.auth_header(),
            json!({ "name": "Inbox" }),
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    let response = ctx
        .send_json(
            "POST",
            "/v1/categories",
            &ctx.auth_header(),
            json!({ "name": "Inbox" }),
        )
        .await;
    assert_status(response, StatusCode::CONFLICT).await;

    // Different owner, same name: fine
    let response = ctx
        .send_json(
            "POST",
            "/v1/categories",
            &ctx.other_auth_header(),
            json!({ "name": "Inbox" }),
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    let response = body_json(
        ctx.send_empty("GET", "/v1/categories", &ctx.auth_header())
            .await,
    )
    .await;
    assert_eq!(response["categories"].as_array().unwrap().len(), 1);
    assert_eq!(response["empty"].as_array().unwrap().len(), 1);
    assert_eq!(response["full"].as_array().unwrap().len(), 0);

    ctx.cleanup().await.unwrap();
}
