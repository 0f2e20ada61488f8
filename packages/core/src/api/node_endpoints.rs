//! Node Endpoints for the HTTP Dev API
//!
//! REST surface mirroring the boundary contracts of the timeline node
//! layer. Bodies arrive as loose JSON and go through the validation
//! layer explicitly, so transport-form coercions (string `maxDepth`,
//! truthy `includeChildren`) behave exactly as they do for the real
//! backend.
//!
//! # Endpoints
//!
//! - `GET /api/health` - health check
//! - `POST /api/nodes` - create a node
//! - `GET /api/nodes/:id` - fetch a node
//! - `PATCH /api/nodes/:id` - update meta / re-parent
//! - `DELETE /api/nodes/:id` - delete a subtree
//! - `GET /api/nodes/:id/hierarchy` - resolve the bounded hierarchy
//!
//! The viewer identity comes from the `x-user-id` header; real
//! authentication is a collaborator concern and this surface is local
//! development only.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::api::{AppState, HttpError};
use crate::models::{DeleteNodeResponse, HierarchyResponse, TimelineNodeResponse};
use crate::services::permission::project;
use crate::validation::{validate_create, validate_query, validate_update};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:3400/api/health
/// ```
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Viewer identity from the `x-user-id` header.
fn viewer_id(headers: &HeaderMap) -> Result<i64, HttpError> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| {
            HttpError::new(
                "Missing or invalid x-user-id header",
                "INVALID_VIEWER",
            )
        })
}

/// Create a node
///
/// ```bash
/// curl -X POST http://localhost:3400/api/nodes \
///   -H "Content-Type: application/json" -H "x-user-id: 1" \
///   -d '{"type": "job", "meta": {"role": "Engineer", "company": "Acme"}}'
/// ```
async fn create_node(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<TimelineNodeResponse>), HttpError> {
    let viewer = viewer_id(&headers)?;
    let request = validate_create(&body)?;
    let node = state.nodes.create_node(viewer, request).await?;
    Ok((StatusCode::CREATED, Json(TimelineNodeResponse::from_node(&node))))
}

/// Fetch a node, with the viewer's permission projection attached.
async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TimelineNodeResponse>, HttpError> {
    let viewer = viewer_id(&headers)?;
    let node = state
        .nodes
        .get_node(&id)
        .await?
        .ok_or_else(|| HttpError::node_not_found(&id))?;

    let permissions = project(&node, viewer, state.policy.as_ref());
    if !permissions.can_view {
        return Err(HttpError::node_not_found(&id));
    }

    Ok(Json(
        TimelineNodeResponse::from_node(&node).with_permissions(permissions),
    ))
}

/// Update a node's meta and/or parent. The empty body is a valid no-op.
async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<TimelineNodeResponse>, HttpError> {
    let viewer = viewer_id(&headers)?;
    let patch = validate_update(&body)?;

    let node = state
        .nodes
        .get_node(&id)
        .await?
        .ok_or_else(|| HttpError::node_not_found(&id))?;
    if !project(&node, viewer, state.policy.as_ref()).can_edit {
        return Err(HttpError::node_not_found(&id));
    }

    let updated = state.nodes.update_node(&id, patch).await?;
    let permissions = project(&updated, viewer, state.policy.as_ref());
    Ok(Json(
        TimelineNodeResponse::from_node(&updated).with_permissions(permissions),
    ))
}

/// Delete a node and its descendants.
async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<DeleteNodeResponse>, HttpError> {
    let viewer = viewer_id(&headers)?;

    let node = state
        .nodes
        .get_node(&id)
        .await?
        .ok_or_else(|| HttpError::node_not_found(&id))?;
    if !project(&node, viewer, state.policy.as_ref()).can_delete {
        return Err(HttpError::node_not_found(&id));
    }

    let deleted_count = state.nodes.delete_node(&id).await?;
    Ok(Json(DeleteNodeResponse { id, deleted_count }))
}

/// Resolve the hierarchy around a node.
///
/// Query parameters arrive in string transport form and are coerced by
/// the validation layer (`maxDepth` 1-20 default 10, truthy
/// `includeChildren`, optional `type` filter).
async fn get_hierarchy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<HierarchyResponse>, HttpError> {
    let viewer = viewer_id(&headers)?;

    let raw: Map<String, Value> = params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    let query = validate_query(&Value::Object(raw))?;

    let response = state.hierarchy.resolve(&id, &query, viewer).await?;
    Ok(Json(response))
}

/// Routes for this module, nested under the shared state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/nodes", axum::routing::post(create_node))
        .route(
            "/api/nodes/:id",
            get(get_node).patch(update_node).delete(delete_node),
        )
        .route("/api/nodes/:id/hierarchy", get(get_hierarchy))
}
