//! User Profile Model
//!
//! Minimal profile record used to build the `owner` projection on node
//! responses. Account management itself is a collaborator concern; this
//! crate only needs enough of a profile to project ownership.

use serde::{Deserialize, Serialize};

/// Profile of a user who owns timeline nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
}

impl UserProfile {
    /// Profile with only the required fields set.
    pub fn new(id: i64, email: impl Into<String>) -> Self {
        Self {
            id,
            user_name: None,
            first_name: None,
            last_name: None,
            email: email.into(),
        }
    }
}
