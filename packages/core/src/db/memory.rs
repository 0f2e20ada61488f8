//! In-Memory Store
//!
//! Reference `TimelineStore`/`UserDirectory` implementation over a
//! `tokio::sync::RwLock`-guarded map. Backs the test suites and the dev
//! server; real persistence lives with the storage collaborator.

use crate::db::store::{TimelineStore, UserDirectory};
use crate::models::{TimelineNode, UserProfile};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory node store keyed by node id.
#[derive(Default)]
pub struct MemoryStore {
    nodes: RwLock<HashMap<String, TimelineNode>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored nodes. Test helper.
    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    /// Whether the store is empty. Test helper.
    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }
}

fn sort_stable(nodes: &mut [TimelineNode]) {
    nodes.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[async_trait]
impl TimelineStore for MemoryStore {
    async fn insert_node(&self, node: TimelineNode) -> Result<TimelineNode> {
        let mut nodes = self.nodes.write().await;
        if nodes.contains_key(&node.id) {
            bail!("duplicate node id: {}", node.id);
        }
        nodes.insert(node.id.clone(), node.clone());
        Ok(node)
    }

    async fn get_node(&self, id: &str) -> Result<Option<TimelineNode>> {
        Ok(self.nodes.read().await.get(id).cloned())
    }

    async fn update_node(&self, node: TimelineNode) -> Result<TimelineNode> {
        let mut nodes = self.nodes.write().await;
        if !nodes.contains_key(&node.id) {
            bail!("node does not exist: {}", node.id);
        }
        nodes.insert(node.id.clone(), node.clone());
        Ok(node)
    }

    async fn delete_nodes(&self, ids: &[String]) -> Result<u64> {
        let mut nodes = self.nodes.write().await;
        let mut deleted = 0;
        for id in ids {
            if nodes.remove(id).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn get_children(&self, parent_id: &str) -> Result<Vec<TimelineNode>> {
        let nodes = self.nodes.read().await;
        let mut children: Vec<TimelineNode> = nodes
            .values()
            .filter(|n| n.parent_id.as_deref() == Some(parent_id))
            .cloned()
            .collect();
        sort_stable(&mut children);
        Ok(children)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<TimelineNode>> {
        let nodes = self.nodes.read().await;
        let mut owned: Vec<TimelineNode> = nodes
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        sort_stable(&mut owned);
        Ok(owned)
    }
}

/// In-memory user directory keyed by user id.
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: RwLock<HashMap<i64, UserProfile>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a profile.
    pub async fn put_user(&self, profile: UserProfile) {
        self.users.write().await.insert(profile.id, profile);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn get_user(&self, user_id: i64) -> Result<Option<UserProfile>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NodeType;
    use serde_json::json;

    fn node(user_id: i64, parent: Option<&str>) -> TimelineNode {
        TimelineNode::new(
            user_id,
            NodeType::Event,
            parent.map(str::to_string),
            json!({"title": "t"}).as_object().cloned().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let store = MemoryStore::new();
        let created = store.insert_node(node(1, None)).await.unwrap();
        let fetched = store.get_node(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_ids() {
        let store = MemoryStore::new();
        let created = store.insert_node(node(1, None)).await.unwrap();
        assert!(store.insert_node(created).await.is_err());
    }

    #[tokio::test]
    async fn test_update_requires_existing_node() {
        let store = MemoryStore::new();
        assert!(store.update_node(node(1, None)).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_reports_existing_count_only() {
        let store = MemoryStore::new();
        let a = store.insert_node(node(1, None)).await.unwrap();
        let deleted = store
            .delete_nodes(&[a.id.clone(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_children_and_user_listings() {
        let store = MemoryStore::new();
        let root = store.insert_node(node(1, None)).await.unwrap();
        store.insert_node(node(1, Some(&root.id))).await.unwrap();
        store.insert_node(node(2, Some(&root.id))).await.unwrap();

        assert_eq!(store.get_children(&root.id).await.unwrap().len(), 2);
        assert_eq!(store.list_by_user(1).await.unwrap().len(), 2);
        assert_eq!(store.list_by_user(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_user_directory_lookup() {
        let directory = MemoryUserDirectory::new();
        directory.put_user(UserProfile::new(5, "a@b.c")).await;
        assert!(directory.get_user(5).await.unwrap().is_some());
        assert!(directory.get_user(6).await.unwrap().is_none());
    }
}
