use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::api::permissions::PermissionRegistry;
use crate::api::router::route_table;
use crate::config::Config;
use crate::domain::services::audit_recorder::AuditRecorder;
use crate::infra::identity::jwt_provider::JwtIdentityProvider;
use crate::infra::repositories::{
    postgres_account_repo::PostgresAccountRepo, postgres_audit_repo::PostgresAuditRepo,
    postgres_membership_repo::PostgresMembershipRepo, postgres_profile_repo::PostgresProfileRepo,
    postgres_workspace_repo::PostgresWorkspaceRepo, sqlite_account_repo::SqliteAccountRepo,
    sqlite_audit_repo::SqliteAuditRepo, sqlite_membership_repo::SqliteMembershipRepo,
    sqlite_profile_repo::SqliteProfileRepo, sqlite_workspace_repo::SqliteWorkspaceRepo,
};
use crate::state::AppState;

/// Builds the permission registry and proves it covers every registered
/// route. An unmapped route refuses startup; authorization never meets a
/// route the registry does not know.
fn build_permission_registry() -> Arc<PermissionRegistry> {
    let registry = PermissionRegistry::build();
    if let Err(missing) = registry.validate(&route_table()) {
        panic!("Permission registry is missing entries for: {}", missing.join(", "));
    }
    Arc::new(registry)
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let permissions = build_permission_registry();
    let identity = Arc::new(JwtIdentityProvider::new(config));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let account_repo = Arc::new(PostgresAccountRepo::new(pool.clone()));
        let audit_repo = Arc::new(PostgresAuditRepo::new(pool.clone()));
        let audit = Arc::new(AuditRecorder::new(audit_repo.clone(), account_repo.clone()));

        AppState {
            config: config.clone(),
            account_repo,
            workspace_repo: Arc::new(PostgresWorkspaceRepo::new(pool.clone())),
            profile_repo: Arc::new(PostgresProfileRepo::new(pool.clone())),
            membership_repo: Arc::new(PostgresMembershipRepo::new(pool.clone())),
            audit_repo,
            identity,
            permissions,
            audit,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let account_repo = Arc::new(SqliteAccountRepo::new(pool.clone()));
        let audit_repo = Arc::new(SqliteAuditRepo::new(pool.clone()));
        let audit = Arc::new(AuditRecorder::new(audit_repo.clone(), account_repo.clone()));

        AppState {
            config: config.clone(),
            account_repo,
            workspace_repo: Arc::new(SqliteWorkspaceRepo::new(pool.clone())),
            profile_repo: Arc::new(SqliteProfileRepo::new(pool.clone())),
            membership_repo: Arc::new(SqliteMembershipRepo::new(pool.clone())),
            audit_repo,
            identity,
            permissions,
            audit,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
