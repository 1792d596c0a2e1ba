use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-account display identity inside one workspace.
/// At most one profile exists per (account, workspace) pair.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub workspace_id: String,
    pub account_id: String,
}

impl Profile {
    pub fn new(name: String, workspace_id: String, account_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            workspace_id,
            account_id,
        }
    }
}
