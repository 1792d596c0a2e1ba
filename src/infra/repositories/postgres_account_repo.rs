use crate::domain::models::account::{Account, AccountStatus};
use crate::domain::ports::AccountRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAccountRepo {
    pool: PgPool,
}

impl PostgresAccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepo {
    async fn create(&self, account: &Account) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, full_name, email, phone, password_hash, is_super_admin, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
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
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Account>, AppError> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_role(&self, id: &str, is_super_admin: bool) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET is_super_admin = $1 WHERE id = $2 RETURNING *",
        )
            .bind(is_super_admin)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: AccountStatus) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>("UPDATE accounts SET status = $1 WHERE id = $2 RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
