//! Permission Projection
//!
//! Computes per-node capability flags relative to a viewer identity.
//! The projection is a pure function of (node, viewer, policy snapshot):
//! it is recomputed on every response and never persisted, since
//! ownership and sharing state can change between requests.
//!
//! The grant model itself belongs to an authorization collaborator; this
//! module fixes the output shape and ships two policies:
//!
//! - [`OwnershipPolicy`] - owner sees everything, everyone else nothing
//! - [`StaticGrantPolicy`] - ownership plus an explicit per-node grant
//!   table, the shape a sharing backend would snapshot per request

use crate::models::{AccessLevel, NodePermissions, TimelineNode};
use crate::registry::NodeType;
use std::collections::{HashMap, HashSet};

/// Sharing-state snapshot consulted during projection.
///
/// Implementations classify a viewer's access to a node; the projection
/// into concrete capability flags is fixed by [`project`].
pub trait AccessPolicy: Send + Sync {
    /// Classify `viewer`'s access to `node`.
    fn access_level(&self, node: &TimelineNode, viewer: i64) -> AccessLevel;

    /// Whether cross-user matching features apply to this node for this
    /// viewer. Orthogonal to CRUD access; the default shows matches on
    /// experience-bearing node types the viewer can see.
    fn shows_matches(&self, node: &TimelineNode, viewer: i64) -> bool {
        self.access_level(node, viewer) != AccessLevel::Private
            && matches!(node.node_type, NodeType::Job | NodeType::CareerTransition)
    }
}

/// Owner-only policy: the owner has full access, everyone else none.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipPolicy;

impl AccessPolicy for OwnershipPolicy {
    fn access_level(&self, node: &TimelineNode, viewer: i64) -> AccessLevel {
        if node.user_id == viewer {
            AccessLevel::Full
        } else {
            AccessLevel::Private
        }
    }
}

/// Ownership plus an explicit grant table: (node id -> viewers with
/// restricted read access). Stands in for the sharing backend's
/// per-request snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticGrantPolicy {
    grants: HashMap<String, HashSet<i64>>,
}

impl StaticGrantPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `viewer` restricted read access to `node_id`.
    pub fn grant(&mut self, node_id: impl Into<String>, viewer: i64) {
        self.grants.entry(node_id.into()).or_default().insert(viewer);
    }
}

impl AccessPolicy for StaticGrantPolicy {
    fn access_level(&self, node: &TimelineNode, viewer: i64) -> AccessLevel {
        if node.user_id == viewer {
            AccessLevel::Full
        } else if self
            .grants
            .get(&node.id)
            .is_some_and(|viewers| viewers.contains(&viewer))
        {
            AccessLevel::Restricted
        } else {
            AccessLevel::Private
        }
    }
}

/// Project a node's capability flags for a viewer.
///
/// Pure: no I/O, no caching. Callers filter out `Private` projections
/// before building responses - a response must never include a node its
/// viewer cannot view, so `can_view` is true for every node actually
/// returned.
pub fn project(node: &TimelineNode, viewer: i64, policy: &dyn AccessPolicy) -> NodePermissions {
    match policy.access_level(node, viewer) {
        AccessLevel::Full => NodePermissions::full(policy.shows_matches(node, viewer)),
        AccessLevel::Restricted => NodePermissions::restricted(policy.shows_matches(node, viewer)),
        AccessLevel::Private => NodePermissions::private(),
    }
}
