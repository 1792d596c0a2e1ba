use crate::api::dtos::requests::UpdateProfileRequest;
use crate::api::dtos::responses::ApiResponse;
use crate::api::handlers::workspace::ensure_workspace_scope;
use crate::domain::models::auth::RequestContext;
use crate::domain::services::audit_recorder::AuditEntry;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

/// Callers update only their own profile inside the workspace.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_workspace_scope(&ctx, &id)?;

    let name = payload.name.trim().to_string();
    if name.is_empty() || name.len() > 100 {
        return Err(AppError::Validation("name must be between 1 and 100 characters".into()));
    }

    state
        .profile_repo
        .find(&id, &ctx.account_id)
        .await?
        .ok_or(AppError::NotFound("Profile not found".into()))?;

    let updated = state.profile_repo.update_name(&id, &ctx.account_id, &name).await?;

    state
        .audit
        .record(&ctx, AuditEntry {
            action: "profile.updated",
            entity_type: "profile",
            entity_id: updated.id.clone(),
            target_id: None,
            details: Some(serde_json::json!({ "name": updated.name })),
            workspace_id: Some(id),
        })
        .await;

    Ok(Json(ApiResponse::ok(updated)))
}
