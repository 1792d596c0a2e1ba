use crate::domain::models::account::AccountStatus;
use crate::domain::models::auth::RequestContext;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Account lifecycle guard for sensitive routes. Runs after authentication
/// and authorization; gates on account status, not on permission.
pub async fn require_active_account(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    let account = state
        .account_repo
        .find_by_id(&ctx.account_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if account.status != AccountStatus::Active {
        return Err(AppError::Forbidden(format!("Account is {}", account.status)));
    }

    Ok(next.run(req).await)
}
