//! Response Shapes
//!
//! Outbound contract types for single-node and hierarchy responses.
//! Every shape here is strict/closed (`deny_unknown_fields`): a payload
//! carrying any field outside the documented contract fails to
//! deserialize. That is deliberate — schema drift between producer and
//! consumer should fail loudly in development, not silently drop fields
//! in production.
//!
//! The `parent`, `owner`, and `permissions` sub-objects are each
//! independently optional: a minimal node response with none of them is
//! valid (e.g. self-owned queries where the caller's identity is
//! implicit).

use crate::models::node::TimelineNode;
use crate::models::permissions::NodePermissions;
use crate::models::user::UserProfile;
use crate::registry::NodeType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Summary of a node's parent attached to responses.
///
/// `title` is optional because some node types (jobs) label themselves
/// with `role` instead of a generic `title` — the projection tolerates
/// its absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParentSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ParentSummary {
    /// Build a parent summary from the parent node itself.
    pub fn from_node(parent: &TimelineNode) -> Self {
        Self {
            id: parent.id.clone(),
            node_type: parent.node_type,
            title: parent.display_label(),
        }
    }
}

/// Summary of a node's owner attached to responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OwnerSummary {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
}

impl From<UserProfile> for OwnerSummary {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            user_name: profile.user_name,
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
        }
    }
}

/// Single-node response shape.
///
/// Strict: no fields beyond the documented ones are permitted. The
/// projections (`parent`, `owner`, `permissions`) are derived per
/// request and independently nullable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimelineNodeResponse {
    pub id: String,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub parent_id: Option<String>,
    pub meta: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<NodePermissions>,
}

impl TimelineNodeResponse {
    /// Minimal response with no projections attached.
    pub fn from_node(node: &TimelineNode) -> Self {
        Self {
            id: node.id.clone(),
            user_id: node.user_id,
            node_type: node.node_type,
            parent_id: node.parent_id.clone(),
            meta: node.meta.clone(),
            created_at: node.created_at,
            updated_at: node.updated_at,
            parent: None,
            owner: None,
            permissions: None,
        }
    }

    /// Attach a parent projection.
    pub fn with_parent(mut self, parent: Option<ParentSummary>) -> Self {
        self.parent = parent;
        self
    }

    /// Attach an owner projection.
    pub fn with_owner(mut self, owner: Option<OwnerSummary>) -> Self {
        self.owner = owner;
        self
    }

    /// Attach a permission projection.
    pub fn with_permissions(mut self, permissions: NodePermissions) -> Self {
        self.permissions = Some(permissions);
        self
    }
}

/// Hierarchy query response: the resolved nodes plus the total count of
/// nodes matching the query. `total_count` may exceed `nodes.len()` when
/// a downstream collaborator paginates; it is never negative and never
/// fractional (enforced at deserialization by the `u64` type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HierarchyResponse {
    pub nodes: Vec<TimelineNodeResponse>,
    pub total_count: u64,
}

/// Result of a delete operation, reporting the subtree size removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteNodeResponse {
    pub id: String,
    pub deleted_count: u64,
}
