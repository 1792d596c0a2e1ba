use crate::api::dtos::requests::{CreateWorkspaceRequest, UpdateWorkspaceRequest};
use crate::api::dtos::responses::ApiResponse;
use crate::domain::models::auth::RequestContext;
use crate::domain::models::membership::{Membership, Role};
use crate::domain::models::profile::Profile;
use crate::domain::models::workspace::Workspace;
use crate::domain::services::audit_recorder::AuditEntry;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;

/// Workspace-scoped routes carry the workspace id both in the path and in
/// the x-workspace-id header; the two must agree.
pub fn ensure_workspace_scope(ctx: &RequestContext, workspace_id: &str) -> Result<(), AppError> {
    if ctx.workspace_id.is_empty() {
        return Err(AppError::MissingParameter("x-workspace-id".into()));
    }
    if ctx.workspace_id != workspace_id {
        return Err(AppError::Forbidden("Workspace context mismatch".into()));
    }
    Ok(())
}

pub async fn list_workspaces(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<impl IntoResponse, AppError> {
    let workspaces = state.workspace_repo.list_by_account(&ctx.account_id).await?;
    Ok(Json(ApiResponse::ok(workspaces)))
}

pub async fn create_workspace(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<CreateWorkspaceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() || name.len() > 100 {
        return Err(AppError::Validation("name must be between 1 and 100 characters".into()));
    }

    let account = state
        .account_repo
        .find_by_id(&ctx.account_id)
        .await?
        .ok_or(AppError::NotFound("Account not found".into()))?;

    let workspace = Workspace::new(name, payload.description, account.id.clone());
    let membership = Membership::new(workspace.id.clone(), account.id.clone(), Role::Admin);
    let profile = Profile::new(account.full_name.clone(), workspace.id.clone(), account.id);

    let created = state
        .workspace_repo
        .create_with_owner(&workspace, &membership, &profile)
        .await?;

    info!("Workspace created: {}", created.id);

    state
        .audit
        .record(&ctx, AuditEntry {
            action: "workspace.created",
            entity_type: "workspace",
            entity_id: created.id.clone(),
            target_id: None,
            details: Some(serde_json::json!({ "name": created.name })),
            workspace_id: Some(created.id.clone()),
        })
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(created))))
}

pub async fn get_workspace(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    ensure_workspace_scope(&ctx, &id)?;

    let workspace = state
        .workspace_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Workspace not found".into()))?;

    Ok(Json(ApiResponse::ok(workspace)))
}

pub async fn update_workspace(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateWorkspaceRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_workspace_scope(&ctx, &id)?;

    let mut workspace = state
        .workspace_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Workspace not found".into()))?;

    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() || name.len() > 100 {
            return Err(AppError::Validation("name must be between 1 and 100 characters".into()));
        }
        workspace.name = name;
    }
    if let Some(description) = payload.description {
        workspace.description = Some(description);
    }

    let updated = state.workspace_repo.update(&workspace).await?;

    info!("Workspace updated: {}", id);

    state
        .audit
        .record(&ctx, AuditEntry {
            action: "workspace.updated",
            entity_type: "workspace",
            entity_id: id.clone(),
            target_id: None,
            details: Some(serde_json::json!({ "name": updated.name })),
            workspace_id: Some(id),
        })
        .await;

    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn delete_workspace(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    ensure_workspace_scope(&ctx, &id)?;

    let workspace = state
        .workspace_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Workspace not found".into()))?;

    state.workspace_repo.delete_cascade(&workspace.id).await?;

    info!("Workspace deleted: {}", id);

    state
        .audit
        .record(&ctx, AuditEntry {
            action: "workspace.deleted",
            entity_type: "workspace",
            entity_id: id.clone(),
            target_id: None,
            details: Some(serde_json::json!({ "name": workspace.name })),
            workspace_id: Some(id),
        })
        .await;

    Ok(Json(ApiResponse::ok(serde_json::json!({ "status": "deleted" }))))
}
