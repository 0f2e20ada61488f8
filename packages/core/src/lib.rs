//! Journey Core - Timeline Node Hierarchy Contract
//!
//! This crate implements the data contract at the heart of the career
//! journey timeline product: the node type registry, the validation
//! layer for create/update/query requests, bounded hierarchy resolution,
//! and per-viewer permission projection.
//!
//! # Architecture
//!
//! - **Forest of typed nodes**: every timeline entry is a `TimelineNode`
//!   with a type from a closed registry and an open `meta` object;
//!   parent references form a forest, never a single tree.
//! - **Strict outbound, lenient inbound**: requests are validated with
//!   field-addressable errors and transport-form coercions; responses
//!   are closed shapes where unknown fields fail loudly.
//! - **Derived projections**: permissions and owner/parent summaries are
//!   pure functions of (node, viewer, policy snapshot), recomputed per
//!   request and never stored.
//! - **Collaborator boundaries**: persistence sits behind the async
//!   `TimelineStore` trait and the grant model behind `AccessPolicy`;
//!   the crate ships in-memory implementations for tests and the dev
//!   server.
//!
//! # Modules
//!
//! - [`registry`] - closed node type set and meta conventions
//! - [`models`] - node, projection, and response shapes
//! - [`validation`] - request validation and response shape checks
//! - [`services`] - node CRUD, hierarchy resolution, permissions
//! - [`db`] - store traits and the in-memory reference store
//! - [`api`] - HTTP dev surface
//! - [`config`] - dev server configuration

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod registry;
pub mod services;
pub mod validation;

// Re-export commonly used types
pub use db::{MemoryStore, MemoryUserDirectory, TimelineStore, UserDirectory};
pub use models::{
    AccessLevel, HierarchyResponse, NodePermissions, TimelineNode, TimelineNodeResponse,
    UserProfile,
};
pub use registry::NodeType;
pub use services::{
    HierarchyService, OwnershipPolicy, StaticGrantPolicy, TimelineNodeService,
    TimelineServiceError,
};
pub use validation::{
    validate_create, validate_query, validate_update, HierarchyQuery, ValidationError,
};
