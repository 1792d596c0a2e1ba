use crate::domain::models::audit::AuditLog;
use crate::domain::models::auth::RequestContext;
use crate::domain::ports::{AccountRepository, AuditLogRepository};
use crate::error::AppError;
use serde_json::Value;
use sqlx::types::Json;
use std::sync::Arc;
use tracing::error;

/// What happened, to which entity, optionally to whom.
pub struct AuditEntry {
    pub action: &'static str,
    pub entity_type: &'static str,
    pub entity_id: String,
    pub target_id: Option<String>,
    pub details: Option<Value>,
    pub workspace_id: Option<String>,
}

pub struct AuditRecorder {
    audit_repo: Arc<dyn AuditLogRepository>,
    account_repo: Arc<dyn AccountRepository>,
}

impl AuditRecorder {
    pub fn new(audit_repo: Arc<dyn AuditLogRepository>, account_repo: Arc<dyn AccountRepository>) -> Self {
        Self { audit_repo, account_repo }
    }

    /// Fire-and-forget relative to the triggering operation: a failed
    /// write is logged and swallowed, never propagated to the caller.
    pub async fn record(&self, ctx: &RequestContext, entry: AuditEntry) {
        if let Err(e) = self.try_record(ctx, entry).await {
            error!("Audit log write failed: {:?}", e);
        }
    }

    async fn try_record(&self, ctx: &RequestContext, entry: AuditEntry) -> Result<(), AppError> {
        let actor_email = self
            .account_repo
            .find_by_id(&ctx.account_id)
            .await?
            .map(|a| a.email)
            .unwrap_or_default();

        let target_email = match &entry.target_id {
            Some(target_id) => self.account_repo.find_by_id(target_id).await?.map(|a| a.email),
            None => None,
        };

        let mut log = AuditLog::new(
            entry.action.to_string(),
            entry.entity_type.to_string(),
            entry.entity_id,
            ctx.account_id.clone(),
            actor_email,
        );
        log.target_id = entry.target_id;
        log.target_email = target_email;
        log.details = entry.details.map(Json);
        log.ip_address = ctx.ip_address.clone();
        log.user_agent = ctx.user_agent.clone();
        log.workspace_id = entry.workspace_id;

        self.audit_repo.insert(&log).await
    }
}
