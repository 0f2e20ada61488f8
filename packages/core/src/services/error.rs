//! Service Layer Error Types
//!
//! One taxonomy for everything above the store: validation failures
//! bubble up intact (field-addressable), missing nodes and denied access
//! stay distinct variants internally, and store failures keep their
//! anyhow context chain.
//!
//! The HTTP layer maps `AccessDenied` onto the exact wire response used
//! for `NodeNotFound` - a denied viewer must not be able to distinguish
//! "exists but hidden" from "does not exist".

use crate::validation::{ShapeViolation, ValidationError};
use thiserror::Error;

/// Errors surfaced by the node and hierarchy services.
#[derive(Debug, Error)]
pub enum TimelineServiceError {
    /// Requested node does not exist
    #[error("node not found: {id}")]
    NodeNotFound { id: String },

    /// Viewer lacks permission for the requested node. Internal detail
    /// only; the transport layer presents this as not-found.
    #[error("access denied to node: {id}")]
    AccessDenied { id: String },

    /// Referenced parent node does not exist
    #[error("invalid parent node: {parent_id}")]
    InvalidParent { parent_id: String },

    /// Re-parent would make the node an ancestor of itself
    #[error("circular reference: {node_id} cannot become its own descendant")]
    CircularReference { node_id: String },

    /// Ancestor walk exceeded the supported hierarchy depth, which
    /// indicates a pre-existing cycle or runaway chain in stored data
    #[error("parent chain exceeds {limit} levels starting at {node_id}")]
    HierarchyTooDeep { node_id: String, limit: usize },

    /// Input failed schema constraints
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Producer-side contract drift
    #[error(transparent)]
    Shape(#[from] ShapeViolation),

    /// Store operation failed
    #[error("store operation failed: {0}")]
    Store(#[from] anyhow::Error),
}

impl TimelineServiceError {
    /// Create a node-not-found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Create an access-denied error
    pub fn access_denied(id: impl Into<String>) -> Self {
        Self::AccessDenied { id: id.into() }
    }

    /// Create an invalid-parent error
    pub fn invalid_parent(parent_id: impl Into<String>) -> Self {
        Self::InvalidParent {
            parent_id: parent_id.into(),
        }
    }

    /// Create a circular-reference error
    pub fn circular_reference(node_id: impl Into<String>) -> Self {
        Self::CircularReference {
            node_id: node_id.into(),
        }
    }
}
