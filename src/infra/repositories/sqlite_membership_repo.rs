use crate::domain::models::membership::{MemberRecord, Membership, Role};
use crate::domain::models::profile::Profile;
use crate::domain::ports::MembershipRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteMembershipRepo {
    pool: SqlitePool,
}

impl SqliteMembershipRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for SqliteMembershipRepo {
    async fn create_with_profile(
        &self,
        membership: &Membership,
        profile: &Profile,
    ) -> Result<Membership, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Membership>(
            "INSERT INTO memberships (id, workspace_id, account_id, role, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
            .bind(&membership.id)
            .bind(&membership.workspace_id)
            .bind(&membership.account_id)
            .bind(membership.role)
            .bind(membership.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("INSERT INTO profiles (id, name, workspace_id, account_id) VALUES (?, ?, ?, ?)")
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

    async fn find(&self, workspace_id: &str, account_id: &str) -> Result<Option<Membership>, AppError> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE workspace_id = ? AND account_id = ?",
        )
            .bind(workspace_id)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_account(&self, account_id: &str) -> Result<Vec<Membership>, AppError> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE account_id = ? ORDER BY created_at ASC",
        )
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_members(&self, workspace_id: &str) -> Result<Vec<MemberRecord>, AppError> {
        sqlx::query_as::<_, MemberRecord>(
            "SELECT m.account_id, a.email, a.full_name, m.role, p.name AS profile_name, m.created_at AS joined_at
             FROM memberships m
             JOIN accounts a ON a.id = m.account_id
             LEFT JOIN profiles p ON p.workspace_id = m.workspace_id AND p.account_id = m.account_id
             WHERE m.workspace_id = ?
             ORDER BY m.created_at ASC",
        )
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Membership>, AppError> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_role(
        &self,
        workspace_id: &str,
        account_id: &str,
        role: Role,
    ) -> Result<Membership, AppError> {
        // The admin recount happens inside the write transaction; SQLite's
        // single-writer transaction serializes concurrent demotions.
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let current = sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE workspace_id = ? AND account_id = ?",
        )
            .bind(workspace_id)
            .bind(account_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Membership not found".into()))?;

        if current.role == Role::Admin && role != Role::Admin {
            let admins = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM memberships WHERE workspace_id = ? AND role = 'admin'",
            )
                .bind(workspace_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            if admins <= 1 {
                return Err(AppError::BadRequest("cannot remove the last admin".into()));
            }
        }

        let updated = sqlx::query_as::<_, Membership>(
            "UPDATE memberships SET role = ? WHERE workspace_id = ? AND account_id = ? RETURNING *",
        )
            .bind(role)
            .bind(workspace_id)
            .bind(account_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete_with_profile(&self, workspace_id: &str, account_id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let current = sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE workspace_id = ? AND account_id = ?",
        )
            .bind(workspace_id)
            .bind(account_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Membership not found".into()))?;

        if current.role == Role::Admin {
            let admins = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM memberships WHERE workspace_id = ? AND role = 'admin'",
            )
                .bind(workspace_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            if admins <= 1 {
                return Err(AppError::BadRequest("cannot remove the last admin".into()));
            }
        }

        sqlx::query("DELETE FROM profiles WHERE workspace_id = ? AND account_id = ?")
            .bind(workspace_id)
            .bind(account_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("DELETE FROM memberships WHERE workspace_id = ? AND account_id = ?")
            .bind(workspace_id)
            .bind(account_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
