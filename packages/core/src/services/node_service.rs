//! Node Service - Core CRUD Operations
//!
//! Business logic over the [`TimelineStore`] boundary:
//!
//! - create (parent-existence check, id/timestamp stamping)
//! - get / list-by-owner
//! - update (meta replacement, re-parenting with cycle detection)
//! - delete (subtree cascade, leaf-first)
//!
//! # Acyclicity
//!
//! The validation layer only checks that `parentId` is UUID-shaped; it
//! neither resolves the reference nor walks the chain. This service owns
//! the cycle-prevention contract at the persistence boundary: every
//! re-parent walks the prospective parent's ancestor chain and rejects
//! the write if the moving node appears in it (self-parenting included).

use crate::db::TimelineStore;
use crate::models::time::{SystemTimeProvider, TimeProvider};
use crate::models::TimelineNode;
use crate::services::error::TimelineServiceError;
use crate::validation::{CreateNodeRequest, ParentPatch, UpdateNodePatch};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Hard ceiling on ancestor-chain walks. Chains longer than this
/// indicate corrupted stored data (or a pre-existing cycle written by
/// another producer), not a legitimate hierarchy.
const MAX_HIERARCHY_DEPTH: usize = 1_000;

/// CRUD service for timeline nodes.
pub struct TimelineNodeService {
    store: Arc<dyn TimelineStore>,
    time: Arc<dyn TimeProvider>,
}

impl TimelineNodeService {
    /// Create a service over the given store, using the system clock.
    pub fn new(store: Arc<dyn TimelineStore>) -> Self {
        Self {
            store,
            time: Arc::new(SystemTimeProvider),
        }
    }

    /// Replace the clock. Tests use this with a fixed provider.
    pub fn with_time_provider(mut self, time: Arc<dyn TimeProvider>) -> Self {
        self.time = time;
        self
    }

    /// Shared store handle, for wiring sibling services.
    pub fn store(&self) -> Arc<dyn TimelineStore> {
        Arc::clone(&self.store)
    }

    /// Create a node from a validated request.
    ///
    /// # Errors
    ///
    /// - `InvalidParent` when `parent_id` references a missing node
    /// - `Store` on backend failure
    #[instrument(skip(self, request), fields(node_type = %request.node_type))]
    pub async fn create_node(
        &self,
        user_id: i64,
        request: CreateNodeRequest,
    ) -> Result<TimelineNode, TimelineServiceError> {
        if let Some(parent_id) = &request.parent_id {
            if self.store.get_node(parent_id).await?.is_none() {
                return Err(TimelineServiceError::invalid_parent(parent_id));
            }
        }

        let node = TimelineNode::new_at(
            user_id,
            request.node_type,
            request.parent_id,
            request.meta,
            self.time.now(),
        );
        let created = self.store.insert_node(node).await?;
        debug!(node_id = %created.id, "created timeline node");
        Ok(created)
    }

    /// Fetch a node by id. `Ok(None)` when absent.
    pub async fn get_node(
        &self,
        id: &str,
    ) -> Result<Option<TimelineNode>, TimelineServiceError> {
        Ok(self.store.get_node(id).await?)
    }

    /// All nodes owned by `user_id`.
    pub async fn list_nodes_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<TimelineNode>, TimelineServiceError> {
        Ok(self.store.list_by_user(user_id).await?)
    }

    /// Apply a validated update patch.
    ///
    /// An empty `meta` object is a no-op on metadata (permitted here,
    /// unlike creation); a non-empty one replaces the map wholesale.
    /// `ParentPatch::Clear` moves the node to root level;
    /// `ParentPatch::Set` re-parents after existence and cycle checks.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` when `id` is missing
    /// - `InvalidParent` when the new parent is missing
    /// - `CircularReference` when the move would create a cycle
    #[instrument(skip(self, patch))]
    pub async fn update_node(
        &self,
        id: &str,
        patch: UpdateNodePatch,
    ) -> Result<TimelineNode, TimelineServiceError> {
        let mut node = self
            .store
            .get_node(id)
            .await?
            .ok_or_else(|| TimelineServiceError::node_not_found(id))?;

        if let Some(meta) = patch.meta {
            if !meta.is_empty() {
                node.meta = meta;
            }
        }

        match patch.parent {
            ParentPatch::Unchanged => {}
            ParentPatch::Clear => node.parent_id = None,
            ParentPatch::Set(parent_id) => {
                self.check_reparent(id, &parent_id).await?;
                node.parent_id = Some(parent_id);
            }
        }

        node.updated_at = self.time.now();
        let updated = self.store.update_node(node).await?;
        debug!(node_id = %updated.id, "updated timeline node");
        Ok(updated)
    }

    /// Delete a node and all of its descendants.
    ///
    /// Idempotent: a missing id deletes nothing and returns 0. Children
    /// are removed before their parents.
    #[instrument(skip(self))]
    pub async fn delete_node(&self, id: &str) -> Result<u64, TimelineServiceError> {
        if self.store.get_node(id).await?.is_none() {
            return Ok(0);
        }

        // Breadth-first collection; reversing yields leaf-first order.
        let mut subtree = vec![id.to_string()];
        let mut queue = VecDeque::from([id.to_string()]);
        while let Some(current) = queue.pop_front() {
            for child in self.store.get_children(&current).await? {
                subtree.push(child.id.clone());
                queue.push_back(child.id);
            }
        }
        subtree.reverse();

        let deleted = self.store.delete_nodes(&subtree).await?;
        debug!(node_id = %id, deleted, "deleted timeline subtree");
        Ok(deleted)
    }

    /// Reject re-parent targets that are missing or inside the moving
    /// node's own subtree.
    async fn check_reparent(
        &self,
        node_id: &str,
        new_parent_id: &str,
    ) -> Result<(), TimelineServiceError> {
        if node_id == new_parent_id {
            return Err(TimelineServiceError::circular_reference(node_id));
        }

        let parent = self
            .store
            .get_node(new_parent_id)
            .await?
            .ok_or_else(|| TimelineServiceError::invalid_parent(new_parent_id))?;

        // Walk upward from the new parent; hitting the moving node means
        // the target sits inside its subtree.
        let mut cursor = parent;
        let mut depth = 0usize;
        while let Some(parent_id) = cursor.parent_id.clone() {
            if parent_id == node_id {
                return Err(TimelineServiceError::circular_reference(node_id));
            }
            depth += 1;
            if depth >= MAX_HIERARCHY_DEPTH {
                return Err(TimelineServiceError::HierarchyTooDeep {
                    node_id: node_id.to_string(),
                    limit: MAX_HIERARCHY_DEPTH,
                });
            }
            match self.store.get_node(&parent_id).await? {
                Some(next) => cursor = next,
                // Dangling reference: the chain ends here, no cycle.
                None => break,
            }
        }
        Ok(())
    }
}
