//! HTTP contract tests for the dev API
//!
//! Drives the axum router in-process and checks the wire contract:
//! transport-form coercions on query parameters, field-addressable
//! validation errors, closed response shapes, and the not-found/denied
//! parity that prevents probing for hidden nodes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use journey_core::api::{router, AppState};
use journey_core::services::{HierarchyService, OwnershipPolicy, TimelineNodeService};
use journey_core::validation::validate_node_response_shape;
use journey_core::{MemoryStore, MemoryUserDirectory, UserProfile};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let users = Arc::new(MemoryUserDirectory::new());
    users.put_user(UserProfile::new(1, "ada@example.com")).await;

    let nodes = Arc::new(TimelineNodeService::new(store.clone()));
    let hierarchy = Arc::new(
        HierarchyService::new(store, Arc::new(OwnershipPolicy)).with_user_directory(users),
    );
    router(AppState::new(nodes, hierarchy))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, user: i64, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-user-id", user.to_string())
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn patch_json(uri: &str, user: i64, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-user-id", user.to_string())
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get_as(uri: &str, user: i64) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-user-id", user.to_string())
        .body(Body::empty())
        .unwrap()
}

async fn create_job(app: &Router, user: i64) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/api/nodes",
            user,
            &json!({"type": "job", "meta": {"role": "Engineer", "company": "Acme"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app().await;
    let (status, body) = send(&app, get_as("/api/health", 1)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn test_create_returns_closed_node_shape() {
    let app = app().await;
    let (status, body) = send(
        &app,
        post_json(
            "/api/nodes",
            1,
            &json!({"type": "job", "meta": {"role": "Engineer", "company": "Acme"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    validate_node_response_shape(&body).unwrap();
    assert_eq!(body["userId"], json!(1));
    assert_eq!(body["type"], json!("job"));
    assert!(body["parentId"].is_null());
}

#[tokio::test]
async fn test_create_validation_errors_are_field_addressable() {
    let app = app().await;
    let (status, body) = send(
        &app,
        post_json("/api/nodes", 1, &json!({"type": "job", "meta": {}})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    let paths: Vec<&str> = body["fieldErrors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"meta"));
}

#[tokio::test]
async fn test_missing_viewer_header_is_rejected() {
    let app = app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/nodes")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({"type": "job", "meta": {"role": "x"}})).unwrap(),
        ))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("INVALID_VIEWER"));
}

#[tokio::test]
async fn test_end_to_end_create_then_hierarchy() {
    let app = app().await;
    let id = create_job(&app, 1).await;

    let (status, body) = send(&app, get_as(&format!("/api/nodes/{}/hierarchy", id), 1)).await;
    assert_eq!(status, StatusCode::OK);

    assert!(body["totalCount"].as_u64().unwrap() >= 1);
    let node = body["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == json!(id))
        .unwrap();
    assert_eq!(node["permissions"]["canView"], json!(true));
    assert_eq!(node["permissions"]["canEdit"], json!(true));
    assert_eq!(node["permissions"]["accessLevel"], json!("full"));
    assert_eq!(node["owner"]["email"], json!("ada@example.com"));
}

#[tokio::test]
async fn test_hierarchy_coerces_string_query_params() {
    let app = app().await;
    let id = create_job(&app, 1).await;

    let (status, _) = send(
        &app,
        get_as(&format!("/api/nodes/{}/hierarchy?maxDepth=5", id), 1),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        get_as(&format!("/api/nodes/{}/hierarchy?maxDepth=0", id), 1),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let paths: Vec<&str> = body["fieldErrors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"maxDepth"));
}

#[tokio::test]
async fn test_include_children_string_quirk_on_the_wire() {
    let app = app().await;
    let root = create_job(&app, 1).await;
    let (status, _) = send(
        &app,
        post_json(
            "/api/nodes",
            1,
            &json!({"type": "project", "parentId": root, "meta": {"title": "Side"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The literal string "false" is non-empty, therefore truthy.
    let (_, body) = send(
        &app,
        get_as(
            &format!("/api/nodes/{}/hierarchy?includeChildren=false", root),
            1,
        ),
    )
    .await;
    assert_eq!(body["totalCount"], json!(2));

    // Absence really does disable child inclusion.
    let (_, body) = send(&app, get_as(&format!("/api/nodes/{}/hierarchy", root), 1)).await;
    assert_eq!(body["totalCount"], json!(1));
}

#[tokio::test]
async fn test_denied_and_missing_nodes_are_indistinguishable() {
    let app = app().await;
    let id = create_job(&app, 1).await;

    // Viewer 2 cannot see user 1's private node.
    let (denied_status, denied_body) =
        send(&app, get_as(&format!("/api/nodes/{}", id), 2)).await;
    // A node that never existed.
    let missing = "550e8400-e29b-41d4-a716-446655440000";
    let (missing_status, mut missing_body) =
        send(&app, get_as(&format!("/api/nodes/{}", missing), 2)).await;

    assert_eq!(denied_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);

    // Identical shape and message modulo the id itself.
    missing_body["message"] = json!(format!("Node not found: {}", id));
    assert_eq!(denied_body, missing_body);
}

#[tokio::test]
async fn test_update_empty_body_is_noop() {
    let app = app().await;
    let id = create_job(&app, 1).await;

    let (status, body) = send(&app, patch_json(&format!("/api/nodes/{}", id), 1, &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["role"], json!("Engineer"));
}

#[tokio::test]
async fn test_update_reparent_cycle_is_conflict() {
    let app = app().await;
    let root = create_job(&app, 1).await;
    let (_, child) = send(
        &app,
        post_json(
            "/api/nodes",
            1,
            &json!({"type": "project", "parentId": root, "meta": {"title": "Side"}}),
        ),
    )
    .await;
    let child_id = child["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        patch_json(
            &format!("/api/nodes/{}", root),
            1,
            &json!({"parentId": child_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("CIRCULAR_REFERENCE"));
}

#[tokio::test]
async fn test_delete_reports_subtree_count() {
    let app = app().await;
    let root = create_job(&app, 1).await;
    send(
        &app,
        post_json(
            "/api/nodes",
            1,
            &json!({"type": "action", "parentId": root, "meta": {"title": "Task"}}),
        ),
    )
    .await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/nodes/{}", root))
        .header("x-user-id", "1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], json!(2));
}
