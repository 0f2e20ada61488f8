//! Timeline Node Data Structures
//!
//! This module defines the core `TimelineNode` struct: a single node in a
//! user's career journey hierarchy.
//!
//! # Architecture
//!
//! - **Forest, not tree**: `parent_id = None` means root-level; multiple
//!   roots per user are expected.
//! - **Open metadata**: all type-specific attributes live in the `meta`
//!   JSON object, so new node types never require a storage migration.
//!   Typed views over `meta` live in [`crate::models::meta`].
//! - **Derived projections**: permissions and owner/parent summaries are
//!   computed per request and never stored on the node.
//!
//! # Examples
//!
//! ```rust
//! use journey_core::models::TimelineNode;
//! use journey_core::registry::NodeType;
//! use serde_json::json;
//!
//! let node = TimelineNode::new(
//!     42,
//!     NodeType::Job,
//!     None,
//!     json!({"role": "Engineer", "company": "Acme"})
//!         .as_object()
//!         .cloned()
//!         .unwrap(),
//! );
//! assert!(node.parent_id.is_none());
//! assert_eq!(node.node_type, NodeType::Job);
//! ```

use crate::registry::NodeType;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single node in a user's career journey hierarchy.
///
/// # Fields
///
/// - `id`: UUID string, unique across the store
/// - `user_id`: integer id of the owning user
/// - `node_type`: closed enum of node kinds (immutable after creation)
/// - `parent_id`: optional reference to another node's id (None = root)
/// - `meta`: type-dependent JSON object (non-empty at creation)
/// - `created_at` / `updated_at`: UTC timestamps
///
/// Timestamps are lenient on input (RFC 3339 strings or unix epoch
/// milliseconds) and always serialize as RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineNode {
    /// Unique identifier (UUID v4, string form)
    pub id: String,

    /// Owning user id
    pub user_id: i64,

    /// Node kind from the closed registry
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Parent node id; None for root-level nodes
    pub parent_id: Option<String>,

    /// Type-dependent metadata (role/company for jobs, degree/institution
    /// for education, ...)
    pub meta: Map<String, Value>,

    /// Creation timestamp
    #[serde(deserialize_with = "lenient_datetime")]
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    #[serde(deserialize_with = "lenient_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl TimelineNode {
    /// Create a new node with an auto-generated UUID, stamped with the
    /// current system time.
    pub fn new(
        user_id: i64,
        node_type: NodeType,
        parent_id: Option<String>,
        meta: Map<String, Value>,
    ) -> Self {
        Self::new_at(user_id, node_type, parent_id, meta, Utc::now())
    }

    /// Create a new node stamped with an explicit creation time.
    ///
    /// Services that inject a [`crate::models::time::TimeProvider`] use
    /// this constructor so tests stay deterministic.
    pub fn new_at(
        user_id: i64,
        node_type: NodeType,
        parent_id: Option<String>,
        meta: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            node_type,
            parent_id,
            meta,
            created_at: now,
            updated_at: now,
        }
    }

    /// Display label for this node, per the registry's label convention.
    ///
    /// Job nodes use `meta.role`; other types use `meta.title`. Returns
    /// None when the labeling key is absent — callers must tolerate that
    /// (projections carry an optional title for exactly this reason).
    pub fn display_label(&self) -> Option<String> {
        self.meta
            .get(self.node_type.label_meta_key())
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Accept timestamps as RFC 3339 strings or unix epoch milliseconds.
/// Output serialization is always RFC 3339 (chrono's serde default for
/// `DateTime<Utc>`).
fn lenient_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| D::Error::custom(format!("invalid datetime string {:?}: {}", s, e))),
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .ok_or_else(|| D::Error::custom(format!("invalid epoch millis: {}", n)))?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| D::Error::custom(format!("epoch millis out of range: {}", millis)))
        }
        other => Err(D::Error::custom(format!(
            "expected datetime string or epoch millis, got {}",
            json_kind(&other)
        ))),
    }
}

/// Short human name for a JSON value's kind, used in error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
