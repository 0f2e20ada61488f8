//! Node Validation Layer
//!
//! Validates inbound create/update/query requests and checks outbound
//! response shapes against the closed contract.
//!
//! All failures are field-addressable: a [`ValidationError`] carries one
//! entry per offending field path, never a single opaque string, so UI
//! collaborators can attribute errors to specific form fields.
//!
//! # Coercion semantics
//!
//! Query parameters arrive in string transport form and are coerced:
//!
//! - `maxDepth`: `"5"` becomes `5`; non-integers (`"5.5"`, `5.5`,
//!   `"abc"`) are rejected; inclusive bounds 1-20; default 10.
//! - `includeChildren`: booleans pass through; the empty string is
//!   false; ANY non-empty string is true, including `"false"` and
//!   `"0"`. This mirrors the original wire contract and is kept for
//!   compatibility rather than "fixed" - see [`HierarchyQuery`].
//!
//! # Examples
//!
//! ```rust
//! use journey_core::validation::{validate_create, validate_query};
//! use serde_json::json;
//!
//! let request = validate_create(&json!({
//!     "type": "job",
//!     "meta": {"role": "Engineer", "company": "Acme"}
//! }))
//! .unwrap();
//! assert!(request.parent_id.is_none());
//!
//! let query = validate_query(&json!({"maxDepth": "5"})).unwrap();
//! assert_eq!(query.max_depth, 5);
//! ```

use crate::models::{json_kind, HierarchyResponse, TimelineNodeResponse};
use crate::registry::NodeType;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Inclusive lower bound for `maxDepth`.
pub const MIN_QUERY_DEPTH: u32 = 1;
/// Inclusive upper bound for `maxDepth`.
pub const MAX_QUERY_DEPTH: u32 = 20;
/// Depth applied when the query does not specify one.
pub const DEFAULT_QUERY_DEPTH: u32 = 10;

// UUID shape check only: referential existence is the store's concern.
const UUID_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

/// Whether a string is UUID-shaped.
///
/// # Examples
///
/// ```rust
/// # use journey_core::validation::is_uuid_shaped;
/// assert!(is_uuid_shaped("550e8400-e29b-41d4-a716-446655440000"));
/// assert!(!is_uuid_shaped("not-a-uuid"));
/// ```
pub fn is_uuid_shaped(value: &str) -> bool {
    static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = UUID_REGEX.get_or_init(|| Regex::new(UUID_PATTERN).unwrap());
    regex.is_match(value)
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path of the offending field ("" for body-level errors)
    pub path: String,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Structured, field-addressable validation failure.
///
/// Recoverable by the caller correcting input; never fatal.
#[derive(Debug, Error)]
#[error("validation failed ({} field error(s))", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Empty accumulator; callers push errors and finish with
    /// [`ValidationError::into_result`].
    pub fn accumulate() -> Self {
        Self { errors: Vec::new() }
    }

    /// Single-field failure.
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                path: path.into(),
                message: message.into(),
            }],
        }
    }

    /// Record a failure for `path`.
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Whether any failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(value)` when no failure was recorded, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// First message recorded for `path`, if any. Test/diagnostic helper.
    pub fn message_for(&self, path: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.message.as_str())
    }
}

/// Producer-side contract drift: a response carried fields outside the
/// closed shape. A programming error, surfaced loudly rather than
/// silently stripping fields.
#[derive(Debug, Error)]
#[error("response shape violation: {message}")]
pub struct ShapeViolation {
    pub message: String,
}

/// Validated create request: a node draft minus the server-assigned
/// identity and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateNodeRequest {
    pub node_type: NodeType,
    pub parent_id: Option<String>,
    pub meta: Map<String, Value>,
}

/// Parent change carried by an update patch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParentPatch {
    /// Field absent: leave the parent unchanged
    #[default]
    Unchanged,
    /// Explicit null: move the node to root level
    Clear,
    /// Re-parent under the given node id
    Set(String),
}

/// Validated update patch. Everything is optional; the empty patch is a
/// valid no-op.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateNodePatch {
    /// Replacement meta. `Some(empty map)` is an explicit no-op on
    /// metadata - permitted on update, forbidden on create.
    pub meta: Option<Map<String, Value>>,
    pub parent: ParentPatch,
}

impl UpdateNodePatch {
    /// Whether this patch changes nothing.
    pub fn is_noop(&self) -> bool {
        self.parent == ParentPatch::Unchanged
            && self.meta.as_ref().map_or(true, |m| m.is_empty())
    }
}

/// Normalized hierarchy query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyQuery {
    /// Traversal bound, in edges from the root, inclusive 1-20
    pub max_depth: u32,
    /// Whether descendants are included alongside the ancestor chain
    pub include_children: bool,
    /// Optional node type filter
    pub node_type: Option<NodeType>,
}

impl Default for HierarchyQuery {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_QUERY_DEPTH,
            include_children: false,
            node_type: None,
        }
    }
}

fn body_object<'a>(body: &'a Value) -> Result<&'a Map<String, Value>, ValidationError> {
    body.as_object().ok_or_else(|| {
        ValidationError::single(
            "",
            format!("request body must be a JSON object, got {}", json_kind(body)),
        )
    })
}

fn parse_node_type(errors: &mut ValidationError, path: &str, value: &Value) -> Option<NodeType> {
    match value {
        Value::String(s) => match NodeType::from_str(s) {
            Ok(t) => Some(t),
            Err(_) => {
                errors.push(
                    path,
                    format!(
                        "unknown node type {:?}; expected one of: {}",
                        s,
                        NodeType::ALL.map(|t| t.as_str()).join(", ")
                    ),
                );
                None
            }
        },
        other => {
            errors.push(path, format!("must be a string, got {}", json_kind(other)));
            None
        }
    }
}

/// Validate a create request.
///
/// Requires a registered `type` and a non-empty `meta` object; the
/// optional `parentId` must be UUID-shaped when present. Unknown body
/// keys are ignored (the response contract is the strict side).
///
/// # Errors
///
/// One [`FieldError`] per offending field; all fields are checked even
/// when an earlier one fails, so a form can surface every problem at
/// once.
pub fn validate_create(body: &Value) -> Result<CreateNodeRequest, ValidationError> {
    let object = body_object(body)?;
    let mut errors = ValidationError::accumulate();

    let node_type = match object.get("type") {
        Some(value) => parse_node_type(&mut errors, "type", value),
        None => {
            errors.push("type", "required field is missing");
            None
        }
    };

    let parent_id = validate_parent_reference(&mut errors, object.get("parentId"));

    let meta = match object.get("meta") {
        Some(Value::Object(map)) if !map.is_empty() => Some(map.clone()),
        Some(Value::Object(_)) => {
            errors.push("meta", "must contain at least one key on creation");
            None
        }
        Some(other) => {
            errors.push(
                "meta",
                format!("must be an object, got {}", json_kind(other)),
            );
            None
        }
        None => {
            errors.push("meta", "required field is missing");
            None
        }
    };

    match (node_type, meta) {
        (Some(node_type), Some(meta)) if errors.is_empty() => Ok(CreateNodeRequest {
            node_type,
            parent_id: parent_id.flatten(),
            meta,
        }),
        _ => Err(errors),
    }
}

/// Validate an update patch.
///
/// Everything is optional: `{}` is a valid no-op, `{"meta": {}}` is a
/// valid metadata no-op (forbidden on create, permitted here - creation
/// must establish a minimal identity, an update may be a pass-through),
/// and `{"parentId": null}` moves the node to root level.
pub fn validate_update(body: &Value) -> Result<UpdateNodePatch, ValidationError> {
    let object = body_object(body)?;
    let mut errors = ValidationError::accumulate();

    let meta = match object.get("meta") {
        None => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(other) => {
            errors.push(
                "meta",
                format!("must be an object, got {}", json_kind(other)),
            );
            None
        }
    };

    let parent = match validate_parent_reference(&mut errors, object.get("parentId")) {
        None => ParentPatch::Unchanged,
        Some(None) => ParentPatch::Clear,
        Some(Some(id)) => ParentPatch::Set(id),
    };

    errors.into_result(UpdateNodePatch { meta, parent })
}

/// Shared `parentId` handling: outer Option is field presence, inner is
/// null vs a UUID-shaped string.
fn validate_parent_reference(
    errors: &mut ValidationError,
    value: Option<&Value>,
) -> Option<Option<String>> {
    match value {
        None => None,
        Some(Value::Null) => Some(None),
        Some(Value::String(s)) => {
            if is_uuid_shaped(s) {
                Some(Some(s.clone()))
            } else {
                errors.push("parentId", format!("must be a UUID, got {:?}", s));
                None
            }
        }
        Some(other) => {
            errors.push(
                "parentId",
                format!("must be a UUID string or null, got {}", json_kind(other)),
            );
            None
        }
    }
}

/// Validate and normalize hierarchy query parameters.
///
/// Accepts both native JSON types and the string transport forms query
/// parameters arrive in. See the module docs for coercion semantics.
pub fn validate_query(params: &Value) -> Result<HierarchyQuery, ValidationError> {
    let object = body_object(params)?;
    let mut errors = ValidationError::accumulate();
    let mut query = HierarchyQuery::default();

    match object.get("maxDepth") {
        None | Some(Value::Null) => {}
        Some(value) => match coerce_integer(value) {
            Some(depth) if (MIN_QUERY_DEPTH as i64..=MAX_QUERY_DEPTH as i64).contains(&depth) => {
                query.max_depth = depth as u32;
            }
            Some(depth) => {
                errors.push(
                    "maxDepth",
                    format!(
                        "must be between {} and {} inclusive, got {}",
                        MIN_QUERY_DEPTH, MAX_QUERY_DEPTH, depth
                    ),
                );
            }
            None => {
                errors.push("maxDepth", format!("must be an integer, got {}", value));
            }
        },
    }

    match object.get("includeChildren") {
        None | Some(Value::Null) => {}
        Some(value) => match coerce_boolean(value) {
            Some(flag) => query.include_children = flag,
            None => {
                errors.push(
                    "includeChildren",
                    format!("must be a boolean, got {}", json_kind(value)),
                );
            }
        },
    }

    match object.get("type") {
        None | Some(Value::Null) => {}
        Some(value) => {
            query.node_type = parse_node_type(&mut errors, "type", value);
        }
    }

    errors.into_result(query)
}

/// Integer coercion for transport-form numbers: native integers and
/// integral strings pass, everything else (floats, "5.5", "abc") fails.
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Boolean coercion mirroring the original wire contract's truthiness:
/// booleans pass through, the empty string is false, ANY non-empty
/// string is true (including "false" and "0"), numbers are true unless
/// zero. Preserved for compatibility, not corrected.
fn coerce_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(!s.is_empty()),
        Value::Number(n) => Some(n.as_f64().map_or(false, |f| f != 0.0)),
        _ => None,
    }
}

/// Check a single-node payload against the closed response contract.
///
/// # Errors
///
/// [`ShapeViolation`] when the payload carries unknown fields anywhere
/// in the shape, or when required fields are missing/mistyped.
pub fn validate_node_response_shape(
    value: &Value,
) -> Result<TimelineNodeResponse, ShapeViolation> {
    serde_json::from_value(value.clone()).map_err(|e| ShapeViolation {
        message: e.to_string(),
    })
}

/// Check a hierarchy payload against the closed response contract,
/// including the non-negative integer constraint on `totalCount`.
pub fn validate_hierarchy_response_shape(
    value: &Value,
) -> Result<HierarchyResponse, ShapeViolation> {
    serde_json::from_value(value.clone()).map_err(|e| ShapeViolation {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PARENT: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_create_requires_non_empty_meta() {
        for t in crate::registry::list_types() {
            let err = validate_create(&json!({"type": t.as_str(), "meta": {}})).unwrap_err();
            assert!(err.message_for("meta").is_some());

            let ok = validate_create(&json!({"type": t.as_str(), "meta": {"k": "v"}}));
            assert!(ok.is_ok(), "rejected valid create for {}", t);
        }
    }

    #[test]
    fn test_create_rejects_missing_meta() {
        let err = validate_create(&json!({"type": "job"})).unwrap_err();
        assert_eq!(err.message_for("meta"), Some("required field is missing"));
    }

    #[test]
    fn test_create_rejects_unknown_type() {
        let err = validate_create(&json!({"type": "sabbatical", "meta": {"k": 1}})).unwrap_err();
        assert!(err.message_for("type").unwrap().contains("sabbatical"));
    }

    #[test]
    fn test_create_parent_must_be_uuid_shaped() {
        let err = validate_create(&json!({
            "type": "job",
            "parentId": "not-a-uuid",
            "meta": {"role": "x"}
        }))
        .unwrap_err();
        assert!(err.message_for("parentId").is_some());

        let ok = validate_create(&json!({
            "type": "job",
            "parentId": PARENT,
            "meta": {"role": "x"}
        }))
        .unwrap();
        assert_eq!(ok.parent_id.as_deref(), Some(PARENT));
    }

    #[test]
    fn test_create_null_parent_is_root() {
        let ok = validate_create(&json!({
            "type": "event",
            "parentId": null,
            "meta": {"title": "x"}
        }))
        .unwrap();
        assert!(ok.parent_id.is_none());
    }

    #[test]
    fn test_create_reports_all_failures_at_once() {
        let err = validate_create(&json!({
            "type": "nope",
            "parentId": "bad",
            "meta": {}
        }))
        .unwrap_err();
        assert_eq!(err.errors.len(), 3);
    }

    #[test]
    fn test_update_tolerates_empty_patches() {
        assert!(validate_update(&json!({})).unwrap().is_noop());
        assert!(validate_update(&json!({"meta": {}})).unwrap().is_noop());

        let patch = validate_update(&json!({"parentId": null})).unwrap();
        assert_eq!(patch.parent, ParentPatch::Clear);
        assert!(!patch.is_noop());
    }

    #[test]
    fn test_update_parent_must_be_uuid_shaped() {
        assert!(validate_update(&json!({"parentId": "zzz"})).is_err());
        let patch = validate_update(&json!({"parentId": PARENT})).unwrap();
        assert_eq!(patch.parent, ParentPatch::Set(PARENT.to_string()));
    }

    #[test]
    fn test_query_depth_bounds_inclusive() {
        assert_eq!(validate_query(&json!({"maxDepth": 1})).unwrap().max_depth, 1);
        assert_eq!(validate_query(&json!({"maxDepth": 20})).unwrap().max_depth, 20);

        for bad in [json!(0), json!(21), json!(5.5)] {
            let err = validate_query(&json!({"maxDepth": bad})).unwrap_err();
            assert!(err.message_for("maxDepth").is_some(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_query_depth_coerces_from_strings() {
        assert_eq!(
            validate_query(&json!({"maxDepth": "5"})).unwrap().max_depth,
            5
        );
        assert!(validate_query(&json!({"maxDepth": "5.5"})).is_err());
        assert!(validate_query(&json!({"maxDepth": "abc"})).is_err());
    }

    #[test]
    fn test_query_defaults() {
        let query = validate_query(&json!({})).unwrap();
        assert_eq!(query.max_depth, 10);
        assert!(!query.include_children);
        assert!(query.node_type.is_none());
    }

    #[test]
    fn test_include_children_truthiness_quirk() {
        // Any non-empty string is true, including "false" and "0".
        for truthy in [json!(true), json!("true"), json!("false"), json!("0"), json!(1)] {
            let query = validate_query(&json!({"includeChildren": truthy})).unwrap();
            assert!(query.include_children, "expected truthy: {}", truthy);
        }
        for falsy in [json!(false), json!(""), json!(0)] {
            let query = validate_query(&json!({"includeChildren": falsy})).unwrap();
            assert!(!query.include_children, "expected falsy: {}", falsy);
        }
    }

    #[test]
    fn test_query_type_filter_is_closed() {
        let query = validate_query(&json!({"type": "careerTransition"})).unwrap();
        assert_eq!(query.node_type, Some(NodeType::CareerTransition));
        assert!(validate_query(&json!({"type": "hobby"})).is_err());
    }

    #[test]
    fn test_non_object_bodies_fail_with_body_level_error() {
        for body in [json!(null), json!("x"), json!([1, 2])] {
            let err = validate_create(&body).unwrap_err();
            assert_eq!(err.errors[0].path, "");
        }
    }

    #[test]
    fn test_response_shape_round_trip() {
        let valid = json!({
            "id": PARENT,
            "userId": 1,
            "type": "job",
            "parentId": null,
            "meta": {"role": "x"},
            "createdAt": "2025-06-01T12:00:00Z",
            "updatedAt": "2025-06-01T12:00:00Z"
        });
        assert!(validate_node_response_shape(&valid).is_ok());

        let mut drifted = valid.clone();
        drifted["extraField"] = json!(1);
        assert!(validate_node_response_shape(&drifted).is_err());
    }

    #[test]
    fn test_hierarchy_shape_total_count() {
        assert!(validate_hierarchy_response_shape(&json!({"nodes": [], "totalCount": 0})).is_ok());
        assert!(
            validate_hierarchy_response_shape(&json!({"nodes": [], "totalCount": -1})).is_err()
        );
        assert!(
            validate_hierarchy_response_shape(&json!({"nodes": [], "totalCount": 1.5})).is_err()
        );
    }

    #[test]
    fn test_uuid_shape_check() {
        assert!(is_uuid_shaped(PARENT));
        assert!(is_uuid_shaped("550E8400-E29B-41D4-A716-446655440000"));
        assert!(!is_uuid_shaped("550e8400e29b41d4a716446655440000"));
        assert!(!is_uuid_shaped(""));
    }
}
