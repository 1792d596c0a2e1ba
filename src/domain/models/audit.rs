use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

/// Append-only audit record. Rows are never updated or deleted.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AuditLog {
    pub id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub actor_id: String,
    pub actor_email: String,
    pub target_id: Option<String>,
    pub target_email: Option<String>,
    pub details: Option<Json<Value>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub workspace_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        action: String,
        entity_type: String,
        entity_id: String,
        actor_id: String,
        actor_email: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            action,
            entity_type,
            entity_id,
            actor_id,
            actor_email,
            target_id: None,
            target_email: None,
            details: None,
            ip_address: None,
            user_agent: None,
            workspace_id: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, FromRow)]
pub struct AuditActionCount {
    pub action: String,
    pub count: i64,
}
