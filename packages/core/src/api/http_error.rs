//! HTTP error handling for the dev API
//!
//! Translates the service-layer taxonomy into consistent JSON error
//! bodies: `{ message, code, fieldErrors? }`. Validation failures carry
//! their per-field detail so UI collaborators can attribute errors to
//! specific form fields.
//!
//! Denied access is deliberately presented as not-found: the body and
//! status are byte-identical to the missing-node case, so existence
//! cannot be probed through error-message asymmetry.

use crate::services::TimelineServiceError;
use crate::validation::{FieldError, ValidationError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// JSON error body for the dev API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Per-field detail for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldError>>,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            field_errors: None,
        }
    }

    /// Error body shared by missing and denied nodes.
    pub fn node_not_found(id: &str) -> Self {
        Self::new(format!("Node not found: {}", id), "NODE_NOT_FOUND")
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "NODE_NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" | "INVALID_VIEWER" => StatusCode::BAD_REQUEST,
            "CIRCULAR_REFERENCE" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<ValidationError> for HttpError {
    fn from(err: ValidationError) -> Self {
        Self {
            message: "Request validation failed".to_string(),
            code: "VALIDATION_ERROR".to_string(),
            field_errors: Some(err.errors),
        }
    }
}

impl From<TimelineServiceError> for HttpError {
    fn from(err: TimelineServiceError) -> Self {
        match err {
            // Same wire shape for both: deny must not reveal existence.
            TimelineServiceError::NodeNotFound { id }
            | TimelineServiceError::AccessDenied { id } => HttpError::node_not_found(&id),
            TimelineServiceError::InvalidParent { parent_id } => HttpError {
                message: "Request validation failed".to_string(),
                code: "VALIDATION_ERROR".to_string(),
                field_errors: Some(vec![FieldError {
                    path: "parentId".to_string(),
                    message: format!("parent node does not exist: {}", parent_id),
                }]),
            },
            TimelineServiceError::CircularReference { node_id } => HttpError::new(
                format!(
                    "Cannot re-parent {} under its own descendant",
                    node_id
                ),
                "CIRCULAR_REFERENCE",
            ),
            TimelineServiceError::Validation(v) => v.into(),
            TimelineServiceError::Shape(s) => {
                HttpError::new(s.to_string(), "SHAPE_VIOLATION")
            }
            TimelineServiceError::HierarchyTooDeep { .. } => {
                HttpError::new(err.to_string(), "HIERARCHY_TOO_DEEP")
            }
            TimelineServiceError::Store(e) => {
                HttpError::new(format!("Store operation failed: {}", e), "STORE_ERROR")
            }
        }
    }
}
