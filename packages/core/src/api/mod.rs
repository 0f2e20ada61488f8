//! HTTP Dev API
//!
//! Local development surface exposing the node contract over REST for
//! web-mode testing: no authentication beyond the `x-user-id` viewer
//! header, intended to run next to a frontend dev server, never in
//! production.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::permission::AccessPolicy;
use crate::services::{HierarchyService, TimelineNodeService};

mod http_error;
mod node_endpoints;

pub use http_error::HttpError;
pub use node_endpoints::HealthStatus;

/// Shared handles for the endpoint handlers.
#[derive(Clone)]
pub struct AppState {
    pub nodes: Arc<TimelineNodeService>,
    pub hierarchy: Arc<HierarchyService>,
    pub policy: Arc<dyn AccessPolicy>,
}

impl AppState {
    /// Wire the state from its services. The policy must be the same
    /// one the hierarchy service projects with, or CRUD gating and
    /// hierarchy visibility would disagree.
    pub fn new(
        nodes: Arc<TimelineNodeService>,
        hierarchy: Arc<HierarchyService>,
    ) -> Self {
        let policy = hierarchy.policy();
        Self {
            nodes,
            hierarchy,
            policy,
        }
    }
}

/// Build the dev API router with request tracing.
pub fn router(state: AppState) -> Router {
    node_endpoints::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
