use crate::domain::models::account::{Account, AccountStatus};
use crate::domain::ports::AccountRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAccountRepo {
    pool: SqlitePool,
}

impl SqliteAccountRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepo {
    async fn create(&self, account: &Account) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, full_name, email, phone, password_hash, is_super_admin, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
            .bind(&account.id)
            .bind(&account.full_name)
            .bind(&account.email)
            .bind(&account.phone)
            .bind(&account.password_hash)
            .bind(account.is_super_admin)
            .bind(account.status)
            .bind(account.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Account>, AppError> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_role(&self, id: &str, is_super_admin: bool) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET is_super_admin = ? WHERE id = ? RETURNING *",
        )
            .bind(is_super_admin)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: AccountStatus) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>("UPDATE accounts SET status = ? WHERE id = ? RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
