//! Node Type Registry
//!
//! Defines the closed set of timeline node types and the meta-key
//! conventions each type carries. The registry is static data: it is
//! consulted by the validation layer to enumerate acceptable `type`
//! values, but it does not enforce per-type meta shapes — the
//! validation layer only requires `meta` to be non-empty on creation,
//! and the typed views in [`crate::models::meta`] are an opt-in
//! convenience for producers.
//!
//! # Examples
//!
//! ```rust
//! use journey_core::registry::{list_types, NodeType};
//!
//! assert_eq!(list_types().len(), 6);
//! assert_eq!(NodeType::Job.as_str(), "job");
//! assert_eq!("careerTransition".parse::<NodeType>(), Ok(NodeType::CareerTransition));
//! assert!("milestone".parse::<NodeType>().is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed enumeration of timeline node types.
///
/// Wire names are camelCase (`"job"`, `"careerTransition"`, ...). The
/// set is closed: any other string is rejected in both create and query
/// contexts. A node's type is immutable after creation — there is no
/// update path for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    /// Employment entry (meta: role, company)
    Job,
    /// Education entry (meta: degree, institution)
    Education,
    /// Project entry (meta: title)
    Project,
    /// Point-in-time event (meta: title)
    Event,
    /// Action item attached to another node (meta: title)
    Action,
    /// Transition between roles or fields (meta: fromRole, toRole)
    CareerTransition,
}

impl NodeType {
    /// All node types, in registry order.
    pub const ALL: [NodeType; 6] = [
        NodeType::Job,
        NodeType::Education,
        NodeType::Project,
        NodeType::Event,
        NodeType::Action,
        NodeType::CareerTransition,
    ];

    /// Wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Job => "job",
            NodeType::Education => "education",
            NodeType::Project => "project",
            NodeType::Event => "event",
            NodeType::Action => "action",
            NodeType::CareerTransition => "careerTransition",
        }
    }

    /// Meta keys a node of this type conventionally carries.
    ///
    /// Convention only — not enforced by the validation layer.
    pub fn expected_meta_keys(&self) -> &'static [&'static str] {
        match self {
            NodeType::Job => &["role", "company"],
            NodeType::Education => &["degree", "institution"],
            NodeType::Project => &["title"],
            NodeType::Event => &["title"],
            NodeType::Action => &["title"],
            NodeType::CareerTransition => &["fromRole", "toRole"],
        }
    }

    /// Meta key used as the display label for parent projections.
    ///
    /// Job nodes label themselves with `role` rather than a generic
    /// `title`, which is why `parent.title` is optional in responses.
    pub fn label_meta_key(&self) -> &'static str {
        match self {
            NodeType::Job => "role",
            _ => "title",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = UnknownNodeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownNodeType(s.to_string()))
    }
}

/// Error returned when a string is not a member of the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node type: {0}")]
pub struct UnknownNodeType(pub String);

/// Ordered set of all registered node types.
///
/// Static data: no side effects, no failure modes.
pub fn list_types() -> &'static [NodeType] {
    &NodeType::ALL
}
