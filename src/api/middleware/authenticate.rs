use crate::domain::models::auth::{Claim, RequestContext};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::Span;

/// Authentication stage. Verifies the bearer token through the identity
/// provider, resolves the caller's claim set and freezes everything into
/// a `RequestContext` stored in request extensions. Routes registered as
/// unauthenticated pass through with an anonymous context.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    matched: MatchedPath,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let requires_auth = state
        .permissions
        .lookup(matched.as_str())
        .map(|d| d.authenticated)
        .unwrap_or(true);

    if !requires_auth {
        req.extensions_mut().insert(RequestContext::default());
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    // Single attempt; a provider failure is an invalid token, not a retry.
    let identity = state
        .identity
        .verify(token)
        .await
        .map_err(|_| AppError::InvalidToken)?
        .ok_or(AppError::InvalidToken)?;

    let account = state
        .account_repo
        .find_by_id(&identity.account_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let workspace_id = req
        .headers()
        .get("x-workspace-id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_string();

    let mut claims = vec![Claim::Authenticated];
    if account.is_super_admin {
        claims.push(Claim::Super);
    }
    if !workspace_id.is_empty() {
        if let Some(membership) = state.membership_repo.find(&workspace_id, &account.id).await? {
            claims.push(membership.role.claim());
        }
    }

    let ctx = RequestContext {
        account_id: account.id,
        workspace_id,
        claims,
        ip_address: client_ip(&req),
        user_agent: req
            .headers()
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string()),
    };

    Span::current().record("account_id", ctx.account_id.as_str());
    Span::current().record("workspace_id", ctx.workspace_id.as_str());

    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

fn client_ip(req: &Request) -> Option<String> {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
}
