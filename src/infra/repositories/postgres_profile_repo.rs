use crate::domain::models::profile::Profile;
use crate::domain::ports::ProfileRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresProfileRepo {
    pool: PgPool,
}

impl PostgresProfileRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepo {
    async fn find(&self, workspace_id: &str, account_id: &str) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE workspace_id = $1 AND account_id = $2",
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
            "UPDATE profiles SET name = $1 WHERE workspace_id = $2 AND account_id = $3 RETURNING *",
        )
            .bind(name)
            .bind(workspace_id)
            .bind(account_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
