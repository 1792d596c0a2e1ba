use crate::api::dtos::requests::{AddMemberRequest, UpdateMemberRoleRequest};
use crate::api::dtos::responses::ApiResponse;
use crate::api::handlers::workspace::ensure_workspace_scope;
use crate::domain::models::auth::RequestContext;
use crate::domain::models::membership::{Membership, Role};
use crate::domain::models::profile::Profile;
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

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    ensure_workspace_scope(&ctx, &id)?;

    let members = state.membership_repo.list_members(&id).await?;
    Ok(Json(ApiResponse::ok(members)))
}

pub async fn add_member(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(payload): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_workspace_scope(&ctx, &id)?;

    let role = Role::parse(&payload.role)
        .ok_or_else(|| AppError::Validation("role must be admin or user".into()))?;

    let account = state
        .account_repo
        .find_by_id(&payload.account_id)
        .await?
        .ok_or(AppError::NotFound("Account not found".into()))?;

    if state.membership_repo.find(&id, &account.id).await?.is_some() {
        return Err(AppError::Conflict("Account is already a member of this workspace".into()));
    }

    let membership = Membership::new(id.clone(), account.id.clone(), role);
    let profile_name = payload.profile_name.unwrap_or_else(|| account.full_name.clone());
    let profile = Profile::new(profile_name, id.clone(), account.id.clone());

    let created = state.membership_repo.create_with_profile(&membership, &profile).await?;

    info!("Member {} added to workspace {}", account.id, id);

    state
        .audit
        .record(&ctx, AuditEntry {
            action: "member.added",
            entity_type: "membership",
            entity_id: created.id.clone(),
            target_id: Some(account.id),
            details: Some(serde_json::json!({ "role": created.role })),
            workspace_id: Some(id),
        })
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(created))))
}

pub async fn update_member_role(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path((id, member_id)): Path<(String, String)>,
    Json(payload): Json<UpdateMemberRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_workspace_scope(&ctx, &id)?;

    let role = Role::parse(&payload.role)
        .ok_or_else(|| AppError::Validation("role must be admin or user".into()))?;

    let updated = state.membership_repo.update_role(&id, &member_id, role).await?;

    info!("Member {} role set to {} in workspace {}", member_id, role, id);

    state
        .audit
        .record(&ctx, AuditEntry {
            action: "member.role_updated",
            entity_type: "membership",
            entity_id: updated.id.clone(),
            target_id: Some(member_id),
            details: Some(serde_json::json!({ "role": updated.role })),
            workspace_id: Some(id),
        })
        .await;

    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path((id, member_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    ensure_workspace_scope(&ctx, &id)?;

    let membership = state
        .membership_repo
        .find(&id, &member_id)
        .await?
        .ok_or(AppError::NotFound("Membership not found".into()))?;

    state.membership_repo.delete_with_profile(&id, &member_id).await?;

    info!("Member {} removed from workspace {}", member_id, id);

    state
        .audit
        .record(&ctx, AuditEntry {
            action: "member.removed",
            entity_type: "membership",
            entity_id: membership.id,
            target_id: Some(member_id),
            details: None,
            workspace_id: Some(id),
        })
        .await;

    Ok(Json(ApiResponse::ok(serde_json::json!({ "status": "removed" }))))
}
