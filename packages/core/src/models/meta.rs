//! Typed Meta Views
//!
//! `TimelineNode.meta` is an open JSON object at the storage and
//! validation boundary (only non-emptiness is enforced on creation).
//! This module layers a strict, per-type view over that map: a tagged
//! union with one variant per registered node type, so producers that
//! want compile-time safety can opt into it without changing the wire
//! contract.
//!
//! Parsing is strict — unknown keys fail — which is the point of the
//! typed view. Code that needs to tolerate evolving metadata should keep
//! working with the raw map instead.
//!
//! # Examples
//!
//! ```rust
//! use journey_core::models::meta::{JobMeta, NodeMeta};
//! use journey_core::registry::NodeType;
//! use serde_json::json;
//!
//! let map = json!({"role": "Engineer", "company": "Acme"})
//!     .as_object()
//!     .cloned()
//!     .unwrap();
//! let meta = NodeMeta::from_map(NodeType::Job, &map).unwrap();
//! match meta {
//!     NodeMeta::Job(job) => assert_eq!(job.role, "Engineer"),
//!     _ => unreachable!(),
//! }
//! ```

use crate::registry::NodeType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Error produced when a meta map does not match its type's schema.
#[derive(Debug, Error)]
#[error("invalid {node_type} meta: {message}")]
pub struct MetaError {
    /// Node type whose schema was applied
    pub node_type: NodeType,
    /// Underlying serde message (names the offending key)
    pub message: String,
}

/// Meta for job nodes. Display label is `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobMeta {
    pub role: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Meta for education nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EducationMeta {
    pub degree: String,
    pub institution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Meta for project nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectMeta {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
}

/// Meta for event nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventMeta {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Meta for action nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionMeta {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Meta for career transition nodes. Both endpoints are optional: a
/// transition can be recorded before its destination is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CareerTransitionMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Tagged union over the per-type meta schemas, keyed externally by the
/// node's `type` field (the tag is not embedded in the meta object).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeMeta {
    Job(JobMeta),
    Education(EducationMeta),
    Project(ProjectMeta),
    Event(EventMeta),
    Action(ActionMeta),
    CareerTransition(CareerTransitionMeta),
}

impl NodeMeta {
    /// Parse a raw meta map under the schema for `node_type`.
    pub fn from_map(node_type: NodeType, meta: &Map<String, Value>) -> Result<Self, MetaError> {
        let value = Value::Object(meta.clone());
        let wrap = |e: serde_json::Error| MetaError {
            node_type,
            message: e.to_string(),
        };
        Ok(match node_type {
            NodeType::Job => NodeMeta::Job(serde_json::from_value(value).map_err(wrap)?),
            NodeType::Education => {
                NodeMeta::Education(serde_json::from_value(value).map_err(wrap)?)
            }
            NodeType::Project => NodeMeta::Project(serde_json::from_value(value).map_err(wrap)?),
            NodeType::Event => NodeMeta::Event(serde_json::from_value(value).map_err(wrap)?),
            NodeType::Action => NodeMeta::Action(serde_json::from_value(value).map_err(wrap)?),
            NodeType::CareerTransition => {
                NodeMeta::CareerTransition(serde_json::from_value(value).map_err(wrap)?)
            }
        })
    }

    /// The node type this meta belongs to.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeMeta::Job(_) => NodeType::Job,
            NodeMeta::Education(_) => NodeType::Education,
            NodeMeta::Project(_) => NodeType::Project,
            NodeMeta::Event(_) => NodeType::Event,
            NodeMeta::Action(_) => NodeType::Action,
            NodeMeta::CareerTransition(_) => NodeType::CareerTransition,
        }
    }

    /// Serialize back into the open map form carried on the node.
    ///
    /// Round-trips cleanly: optional fields that are None are omitted,
    /// so the result never contains null padding.
    pub fn into_map(self) -> Map<String, Value> {
        let value = match self {
            NodeMeta::Job(m) => serde_json::to_value(m),
            NodeMeta::Education(m) => serde_json::to_value(m),
            NodeMeta::Project(m) => serde_json::to_value(m),
            NodeMeta::Event(m) => serde_json::to_value(m),
            NodeMeta::Action(m) => serde_json::to_value(m),
            NodeMeta::CareerTransition(m) => serde_json::to_value(m),
        };
        match value {
            Ok(Value::Object(map)) => map,
            // Structs with named fields always serialize to objects.
            _ => Map::new(),
        }
    }
}
