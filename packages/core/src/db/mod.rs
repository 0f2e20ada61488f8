//! Persistence Layer
//!
//! The `TimelineStore` trait is the boundary to the storage
//! collaborator; `MemoryStore` is the in-process reference
//! implementation used by tests and the dev server.

mod memory;
mod store;

pub use memory::{MemoryStore, MemoryUserDirectory};
pub use store::{TimelineStore, UserDirectory};
