//! Hierarchy Query Service
//!
//! Resolves a node plus its connected ancestor/descendant chain, bounded
//! by the query's `max_depth`, and attaches per-node owner/parent/
//! permission projections computed fresh for the requesting viewer.
//!
//! Visibility is per node: a viewer may see a node but not its parent,
//! or a child but not the root's other descendants. Hidden nodes are
//! filtered out before projection - a partial hierarchy is a normal
//! result, not an error - and `can_view` is therefore true on every node
//! the response actually contains.

use crate::db::{TimelineStore, UserDirectory};
use crate::models::{
    HierarchyResponse, OwnerSummary, ParentSummary, TimelineNode, TimelineNodeResponse,
};
use crate::services::error::TimelineServiceError;
use crate::services::permission::{project, AccessPolicy};
use crate::validation::HierarchyQuery;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::instrument;

/// Resolves bounded hierarchies with viewer-relative projections.
pub struct HierarchyService {
    store: Arc<dyn TimelineStore>,
    policy: Arc<dyn AccessPolicy>,
    users: Option<Arc<dyn UserDirectory>>,
}

impl HierarchyService {
    /// Create a service over the given store and access policy.
    pub fn new(store: Arc<dyn TimelineStore>, policy: Arc<dyn AccessPolicy>) -> Self {
        Self {
            store,
            policy,
            users: None,
        }
    }

    /// Attach a user directory so responses carry `owner` projections.
    /// Without one, `owner` stays absent (a valid minimal response).
    pub fn with_user_directory(mut self, users: Arc<dyn UserDirectory>) -> Self {
        self.users = Some(users);
        self
    }

    /// Access policy handle, for callers that gate sibling operations.
    pub fn policy(&self) -> Arc<dyn AccessPolicy> {
        Arc::clone(&self.policy)
    }

    /// Resolve the hierarchy around `root_id` for `viewer`.
    ///
    /// The result contains the root, its ancestor chain up to
    /// `max_depth` edges away, and - when `include_children` - its
    /// descendants up to `max_depth` edges away, breadth-first. Nodes
    /// are ordered outermost ancestor first, then the root, then
    /// descendants in traversal order.
    ///
    /// `total_count` is the number of nodes matching visibility and the
    /// type filter; collaborators that paginate downstream may return
    /// fewer `nodes` than `total_count`, never more.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` when the root does not exist
    /// - `AccessDenied` when the viewer cannot view the root (presented
    ///   on the wire exactly like not-found)
    #[instrument(skip(self, query), fields(max_depth = query.max_depth))]
    pub async fn resolve(
        &self,
        root_id: &str,
        query: &HierarchyQuery,
        viewer: i64,
    ) -> Result<HierarchyResponse, TimelineServiceError> {
        let root = self
            .store
            .get_node(root_id)
            .await?
            .ok_or_else(|| TimelineServiceError::node_not_found(root_id))?;

        if !self.can_view(&root, viewer) {
            return Err(TimelineServiceError::access_denied(root_id));
        }

        // Ancestors, nearest first, bounded by max_depth edges. A parent
        // reference that resolves to nothing ends the chain quietly.
        let mut ancestors: Vec<TimelineNode> = Vec::new();
        let mut cursor = root.clone();
        for _ in 0..query.max_depth {
            let Some(parent_id) = cursor.parent_id.clone() else {
                break;
            };
            let Some(parent) = self.store.get_node(&parent_id).await? else {
                break;
            };
            ancestors.push(parent.clone());
            cursor = parent;
        }

        // Descendants breadth-first, bounded by max_depth edges.
        let mut descendants: Vec<TimelineNode> = Vec::new();
        if query.include_children {
            let mut queue = VecDeque::from([(root.id.clone(), 0u32)]);
            while let Some((current, depth)) = queue.pop_front() {
                if depth >= query.max_depth {
                    continue;
                }
                for child in self.store.get_children(&current).await? {
                    queue.push_back((child.id.clone(), depth + 1));
                    descendants.push(child);
                }
            }
        }

        // Outermost ancestor first, then root, then traversal order.
        ancestors.reverse();
        let mut connected = ancestors;
        connected.push(root);
        connected.extend(descendants);

        // Parent summaries come from the connected set itself; a parent
        // outside the traversal window is simply not summarized.
        let by_id: HashMap<String, TimelineNode> = connected
            .iter()
            .map(|n| (n.id.clone(), n.clone()))
            .collect();

        // Visibility and type filtering happen before projection.
        let visible: Vec<TimelineNode> = connected
            .into_iter()
            .filter(|node| self.can_view(node, viewer))
            .filter(|node| query.node_type.map_or(true, |t| node.node_type == t))
            .collect();

        let total_count = visible.len() as u64;
        let mut nodes = Vec::with_capacity(visible.len());
        for node in &visible {
            nodes.push(self.project_node(node, viewer, &by_id).await?);
        }

        Ok(HierarchyResponse { nodes, total_count })
    }

    fn can_view(&self, node: &TimelineNode, viewer: i64) -> bool {
        project(node, viewer, self.policy.as_ref()).can_view
    }

    /// Attach permissions plus owner/parent summaries to one node.
    async fn project_node(
        &self,
        node: &TimelineNode,
        viewer: i64,
        known: &HashMap<String, TimelineNode>,
    ) -> Result<TimelineNodeResponse, TimelineServiceError> {
        let permissions = project(node, viewer, self.policy.as_ref());

        let parent = node
            .parent_id
            .as_ref()
            .and_then(|pid| known.get(pid))
            .filter(|parent| self.can_view(parent, viewer))
            .map(ParentSummary::from_node);

        let owner = match &self.users {
            Some(users) => users
                .get_user(node.user_id)
                .await?
                .map(OwnerSummary::from),
            None => None,
        };

        Ok(TimelineNodeResponse::from_node(node)
            .with_parent(parent)
            .with_owner(owner)
            .with_permissions(permissions))
    }
}
