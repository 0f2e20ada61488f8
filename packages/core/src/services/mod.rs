//! Business Services
//!
//! - [`TimelineNodeService`] - CRUD orchestration over the store
//! - [`HierarchyService`] - bounded hierarchy resolution with
//!   per-viewer projections
//! - [`permission`] - access policies and the capability projection
//! - [`TimelineServiceError`] - the service-layer error taxonomy

pub mod error;
pub mod hierarchy;
pub mod node_service;
pub mod permission;

pub use error::TimelineServiceError;
pub use hierarchy::HierarchyService;
pub use node_service::TimelineNodeService;
pub use permission::{AccessPolicy, OwnershipPolicy, StaticGrantPolicy};
