use crate::domain::models::{membership::Membership, profile::Profile, workspace::Workspace};
use crate::domain::ports::WorkspaceRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresWorkspaceRepo {
    pool: PgPool,
}

impl PostgresWorkspaceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkspaceRepository for PostgresWorkspaceRepo {
    async fn create_with_owner(
        &self,
        workspace: &Workspace,
        membership: &Membership,
        profile: &Profile,
    ) -> Result<Workspace, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Workspace>(
            "INSERT INTO workspaces (id, name, description, account_id, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
            .bind(&workspace.id)
            .bind(&workspace.name)
            .bind(&workspace.description)
            .bind(&workspace.account_id)
            .bind(workspace.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO memberships (id, workspace_id, account_id, role, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
            .bind(&membership.id)
            .bind(&membership.workspace_id)
            .bind(&membership.account_id)
            .bind(membership.role)
            .bind(membership.created_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("INSERT INTO profiles (id, name, workspace_id, account_id) VALUES ($1, $2, $3, $4)")
            .bind(&profile.id)
            .bind(&profile.name)
            .bind(&profile.workspace_id)
            .bind(&profile.account_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Workspace>, AppError> {
        sqlx::query_as::<_, Workspace>("SELECT * FROM workspaces WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_account(&self, account_id: &str) -> Result<Vec<Workspace>, AppError> {
        sqlx::query_as::<_, Workspace>(
            "SELECT w.* FROM workspaces w
             JOIN memberships m ON m.workspace_id = w.id
             WHERE m.account_id = $1
             ORDER BY w.created_at ASC",
        )
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Workspace>, AppError> {
        sqlx::query_as::<_, Workspace>(
            "SELECT * FROM workspaces ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, workspace: &Workspace) -> Result<Workspace, AppError> {
        sqlx::query_as::<_, Workspace>(
            "UPDATE workspaces SET name = $1, description = $2 WHERE id = $3 RETURNING *",
        )
            .bind(&workspace.name)
            .bind(&workspace.description)
            .bind(&workspace.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_cascade(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM profiles WHERE workspace_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("DELETE FROM memberships WHERE workspace_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Workspace not found".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
