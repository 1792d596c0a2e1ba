use crate::domain::models::profile::Profile;
use crate::domain::ports::ProfileRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteProfileRepo {
    pool: SqlitePool,
}

impl SqliteProfileRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepo {
    async fn find(&self, workspace_id: &str, account_id: &str) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE workspace_id = ? AND account_id = ?",
        )
            .bind(workspace_id)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_name(
        &self,
        workspace_id: &str,
        account_id: &str,
        name: &str,
    ) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET name = ? WHERE workspace_id = ? AND account_id = ? RETURNING *",
        )
            .bind(name)
            .bind(workspace_id)
            .bind(account_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
