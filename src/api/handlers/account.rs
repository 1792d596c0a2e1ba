use crate::api::dtos::responses::ApiResponse;
use crate::domain::models::auth::RequestContext;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

/// Caller's account together with every workspace they belong to, the
/// role held there and the workspace-local profile.
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .account_repo
        .find_by_id(&ctx.account_id)
        .await?
        .ok_or(AppError::NotFound("Account not found".into()))?;

    let memberships = state.membership_repo.list_by_account(&ctx.account_id).await?;

    let mut workspaces = Vec::with_capacity(memberships.len());
    for membership in memberships {
        let workspace = state.workspace_repo.find_by_id(&membership.workspace_id).await?;
        let profile = state
            .profile_repo
            .find(&membership.workspace_id, &ctx.account_id)
            .await?;

        workspaces.push(serde_json::json!({
            "workspace": workspace,
            "role": membership.role,
            "profile": profile,
        }));
    }

    Ok(Json(ApiResponse::ok(serde_json::json!({
        "account": account,
        "workspaces": workspaces,
    }))))
}

pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .account_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Account not found".into()))?;

    Ok(Json(ApiResponse::ok(account)))
}
