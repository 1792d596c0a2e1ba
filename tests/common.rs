use workspace_backend::{
    api::permissions::PermissionRegistry,
    api::router::{create_router, route_table},
    config::Config,
    domain::services::audit_recorder::AuditRecorder,
    infra::identity::jwt_provider::JwtIdentityProvider,
    infra::repositories::{
        sqlite_account_repo::SqliteAccountRepo, sqlite_audit_repo::SqliteAuditRepo,
        sqlite_membership_repo::SqliteMembershipRepo, sqlite_profile_repo::SqliteProfileRepo,
        sqlite_workspace_repo::SqliteWorkspaceRepo,
    },
    state::AppState,
};

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("keys/test_private.pem");
        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_private_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            rate_limit_per_minute: 100_000,
            admin_rate_limit_per_minute: 100_000,
        };

        let registry = PermissionRegistry::build();
        registry
            .validate(&route_table())
            .expect("permission registry must cover every route");

        let account_repo = Arc::new(SqliteAccountRepo::new(pool.clone()));
        let audit_repo = Arc::new(SqliteAuditRepo::new(pool.clone()));
        let audit = Arc::new(AuditRecorder::new(audit_repo.clone(), account_repo.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            account_repo,
            workspace_repo: Arc::new(SqliteWorkspaceRepo::new(pool.clone())),
            profile_repo: Arc::new(SqliteProfileRepo::new(pool.clone())),
            membership_repo: Arc::new(SqliteMembershipRepo::new(pool.clone())),
            audit_repo,
            identity: Arc::new(JwtIdentityProvider::new(&config)),
            permissions: Arc::new(registry),
            audit,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        workspace_id: Option<&str>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(workspace_id) = workspace_id {
            builder = builder.header("x-workspace-id", workspace_id);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Creates an account through the public signup route.
    /// Returns (token, account_id).
    pub async fn signup(&self, full_name: &str, email: &str, password: &str) -> (String, String) {
        let response = self
            .send(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                None,
                Some(serde_json::json!({
                    "full_name": full_name,
                    "email": email,
                    "password": password,
                })),
            )
            .await;

        if !response.status().is_success() {
            panic!("Signup failed in test helper: status {}", response.status());
        }

        let body = body_json(response).await;
        let token = body["data"]["token"].as_str().expect("No token in signup body").to_string();
        let account_id = body["data"]["account"]["id"]
            .as_str()
            .expect("No account id in signup body")
            .to_string();

        (token, account_id)
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let body = body_json(response).await;
        body["data"]["token"].as_str().expect("No token in login body").to_string()
    }

    pub async fn create_workspace(&self, token: &str, name: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/api/v1/workspaces",
                Some(token),
                None,
                Some(serde_json::json!({ "name": name })),
            )
            .await;

        if !response.status().is_success() {
            panic!("Workspace creation failed in test helper: status {}", response.status());
        }

        let body = body_json(response).await;
        body["data"]["id"].as_str().expect("No workspace id in body").to_string()
    }

    pub async fn make_superadmin(&self, account_id: &str) {
        sqlx::query("UPDATE accounts SET is_super_admin = 1 WHERE id = ?")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .expect("Failed to promote test account");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        panic!("Response body is empty. Status: {}", status);
    }
    match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => panic!(
            "Failed to parse JSON: {:?}. Status: {}. Body: {:?}",
            e,
            status,
            String::from_utf8_lossy(&bytes)
        ),
    }
}
