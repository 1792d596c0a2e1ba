use crate::api::dtos::requests::{
    AdminCreateAccountRequest, AuditLogQuery, PageQuery, UpdateAccountRoleRequest,
    UpdateAccountStatusRequest,
};
use crate::api::dtos::responses::{AccountCreatedPayload, ApiResponse};
use crate::api::handlers::auth::hash_password;
use crate::domain::models::account::{Account, AccountStatus};
use crate::domain::models::auth::RequestContext;
use crate::domain::services::audit_recorder::AuditEntry;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use rand::{distributions::Alphanumeric, Rng};
use std::sync::Arc;
use tracing::info;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page(query.limit, query.offset);
    let accounts = state.account_repo.list(limit, offset).await?;
    Ok(Json(ApiResponse::ok(accounts)))
}

pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<AdminCreateAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    let full_name = payload.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(AppError::Validation("full_name must not be empty".into()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::Validation("email is not valid".into()));
    }

    if state.account_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let generated_password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();

    let password_hash = hash_password(&generated_password)?;
    let account = Account::new(full_name, payload.email, payload.phone, password_hash);
    let created = state.account_repo.create(&account).await?;

    info!("Account created by admin: {}", created.id);

    state
        .audit
        .record(&ctx, AuditEntry {
            action: "account.created",
            entity_type: "account",
            entity_id: created.id.clone(),
            target_id: Some(created.id.clone()),
            details: None,
            workspace_id: None,
        })
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(AccountCreatedPayload {
            account: created,
            generated_password,
        })),
    ))
}

pub async fn update_account_role(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAccountRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .account_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Account not found".into()))?;

    let updated = state.account_repo.update_role(&id, payload.is_super_admin).await?;

    info!("Account {} superadmin flag set to {}", id, payload.is_super_admin);

    state
        .audit
        .record(&ctx, AuditEntry {
            action: "account.role_updated",
            entity_type: "account",
            entity_id: id.clone(),
            target_id: Some(id),
            details: Some(serde_json::json!({ "is_super_admin": payload.is_super_admin })),
            workspace_id: None,
        })
        .await;

    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn update_account_status(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAccountStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = AccountStatus::parse(&payload.status)
        .ok_or_else(|| AppError::UnprocessableEntity("unknown account status".into()))?;

    state
        .account_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Account not found".into()))?;

    let updated = state.account_repo.update_status(&id, status).await?;

    info!("Account {} status set to {}", id, status);

    state
        .audit
        .record(&ctx, AuditEntry {
            action: "account.status_updated",
            entity_type: "account",
            entity_id: id.clone(),
            target_id: Some(id),
            details: Some(serde_json::json!({ "status": status })),
            workspace_id: None,
        })
        .await;

    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn list_workspaces(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page(query.limit, query.offset);
    let workspaces = state.workspace_repo.list_all(limit, offset).await?;
    Ok(Json(ApiResponse::ok(workspaces)))
}

pub async fn list_memberships(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page(query.limit, query.offset);
    let memberships = state.membership_repo.list_all(limit, offset).await?;
    Ok(Json(ApiResponse::ok(memberships)))
}

pub async fn list_audit_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuditLogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page(query.limit, query.offset);
    let logs = state
        .audit_repo
        .list(limit, offset, query.action.as_deref(), query.workspace_id.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(logs)))
}

pub async fn audit_log_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let actions = state.audit_repo.stats().await?;
    let total: i64 = actions.iter().map(|a| a.count).sum();

    Ok(Json(ApiResponse::ok(serde_json::json!({
        "total": total,
        "actions": actions,
    }))))
}
