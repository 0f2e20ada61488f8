//! TimelineStore Trait - Persistence Abstraction Layer
//!
//! Abstracts node persistence behind an async trait so the contract
//! layer never touches a concrete database. Production backends live
//! with the persistence collaborator; this crate ships an in-memory
//! implementation ([`crate::db::MemoryStore`]) for tests and the dev
//! server.
//!
//! # Design Decisions
//!
//! 1. **Async-first**: all methods are async so embedded and network
//!    backends share one trait.
//! 2. **Ownership semantics**: write methods take owned nodes; callers
//!    clone if they need to retain the original.
//! 3. **Error handling**: `anyhow::Result` for flexible error context;
//!    the service layer wraps failures into its own taxonomy.
//! 4. **No derived state**: stores persist node rows only. Permissions
//!    and owner/parent projections are computed per request upstream
//!    and must never round-trip through a store.
//!
//! # Acyclicity contract
//!
//! The schema layer does not validate that parent chains are acyclic.
//! Implementations are not required to detect cycles either: the node
//! service performs an ancestor walk before every re-parent write and
//! rejects cycles there. A store that additionally enforces acyclicity
//! (e.g. via a CHECK or trigger) is welcome but not assumed.

use crate::models::{TimelineNode, UserProfile};
use anyhow::Result;
use async_trait::async_trait;

/// Abstraction over node persistence.
///
/// Implementations must be `Send + Sync`; futures may migrate between
/// runtime threads.
#[async_trait]
pub trait TimelineStore: Send + Sync {
    /// Insert a new node.
    ///
    /// # Errors
    ///
    /// Fails on duplicate id or backend failure. Parent existence is
    /// checked by the service layer before insertion, not here.
    async fn insert_node(&self, node: TimelineNode) -> Result<TimelineNode>;

    /// Fetch a node by id. `Ok(None)` when absent (not an error).
    async fn get_node(&self, id: &str) -> Result<Option<TimelineNode>>;

    /// Replace a node row. The id is taken from the node itself.
    ///
    /// # Errors
    ///
    /// Fails when the node does not exist.
    async fn update_node(&self, node: TimelineNode) -> Result<TimelineNode>;

    /// Delete the given node ids, returning how many existed.
    ///
    /// Callers pass complete subtrees ordered leaf-first; the store
    /// itself does no cascade.
    async fn delete_nodes(&self, ids: &[String]) -> Result<u64>;

    /// Direct children of `parent_id`, ordered by creation time then id.
    async fn get_children(&self, parent_id: &str) -> Result<Vec<TimelineNode>>;

    /// All nodes owned by `user_id`, ordered by creation time then id.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<TimelineNode>>;
}

/// Lookup for owner projections.
///
/// The account system is a collaborator; responses only need enough of a
/// profile to fill the `owner` sub-object, and an unknown user simply
/// yields no projection.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user's profile. `Ok(None)` when unknown.
    async fn get_user(&self, user_id: i64) -> Result<Option<UserProfile>>;
}
