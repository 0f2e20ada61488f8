//! Per-Node Permission Projections
//!
//! `NodePermissions` is the viewer-relative capability projection
//! attached to query responses. It is derived, never stored: ownership
//! and sharing state can change between requests, so every response
//! recomputes it from scratch (see [`crate::services::permission`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification explaining why a viewer does or doesn't have access.
///
/// - `Full` — the viewer owns the node (or holds an equivalent grant)
/// - `Restricted` — the viewer was granted read access by the owner
/// - `Private` — the node is private to its owner; the viewer has no
///   access and the node must not appear in responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Full,
    Restricted,
    Private,
}

impl AccessLevel {
    /// Wire name of this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Full => "full",
            AccessLevel::Restricted => "restricted",
            AccessLevel::Private => "private",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Viewer-relative capability flags for a single node.
///
/// Every node actually included in a response has `can_view = true` —
/// filtering happens before projection, never after. The shape is
/// closed: unknown fields fail deserialization, guarding against schema
/// drift between producer and consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodePermissions {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_share: bool,
    pub can_delete: bool,
    pub access_level: AccessLevel,
    /// Whether cross-user matching features apply to this node.
    /// Orthogonal to the CRUD flags.
    pub should_show_matches: bool,
}

impl NodePermissions {
    /// Full owner capabilities.
    pub fn full(should_show_matches: bool) -> Self {
        Self {
            can_view: true,
            can_edit: true,
            can_share: true,
            can_delete: true,
            access_level: AccessLevel::Full,
            should_show_matches,
        }
    }

    /// Read-only grant: visible, not editable.
    pub fn restricted(should_show_matches: bool) -> Self {
        Self {
            can_view: true,
            can_edit: false,
            can_share: false,
            can_delete: false,
            access_level: AccessLevel::Restricted,
            should_show_matches,
        }
    }

    /// No access. Nodes projected at this level are filtered out of
    /// responses rather than returned with all-false flags.
    pub fn private() -> Self {
        Self {
            can_view: false,
            can_edit: false,
            can_share: false,
            can_delete: false,
            access_level: AccessLevel::Private,
            should_show_matches: false,
        }
    }
}
