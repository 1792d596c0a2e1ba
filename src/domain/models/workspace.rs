use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub account_id: String,
    pub created_at: DateTime<Utc>,
}

impl Workspace {
    pub fn new(name: String, description: Option<String>, account_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            account_id,
            created_at: Utc::now(),
        }
    }
}
