use crate::domain::models::audit::{AuditActionCount, AuditLog};
use crate::domain::ports::AuditLogRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAuditRepo {
    pool: SqlitePool,
}

impl SqliteAuditRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for SqliteAuditRepo {
    async fn insert(&self, log: &AuditLog) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO audit_logs (id, action, entity_type, entity_id, actor_id, actor_email,
                                     target_id, target_email, details, ip_address, user_agent,
                                     workspace_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
            .bind(&log.id)
            .bind(&log.action)
            .bind(&log.entity_type)
            .bind(&log.entity_id)
            .bind(&log.actor_id)
            .bind(&log.actor_email)
            .bind(&log.target_id)
            .bind(&log.target_email)
            .bind(&log.details)
            .bind(&log.ip_address)
            .bind(&log.user_agent)
            .bind(&log.workspace_id)
            .bind(log.created_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list(
        &self,
        limit: i64,
        offset: i64,
        action: Option<&str>,
        workspace_id: Option<&str>,
    ) -> Result<Vec<AuditLog>, AppError> {
        let action = action.unwrap_or("");
        let workspace_id = workspace_id.unwrap_or("");

        sqlx::query_as::<_, AuditLog>(
            "SELECT * FROM audit_logs
             WHERE (action = ? OR ? = '')
               AND (workspace_id = ? OR ? = '')
             ORDER BY created_at DESC
             LIMIT ? OFFSET ?",
        )
            .bind(action)
            .bind(action)
            .bind(workspace_id)
            .bind(workspace_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn stats(&self) -> Result<Vec<AuditActionCount>, AppError> {
        sqlx::query_as::<_, AuditActionCount>(
            "SELECT action, COUNT(*) AS count FROM audit_logs GROUP BY action ORDER BY count DESC",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
