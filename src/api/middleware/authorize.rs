use crate::api::permissions::is_authorized;
use crate::domain::models::auth::RequestContext;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{MatchedPath, RawPathParams, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authorization stage. Looks up the role requirement for the route
/// pattern the router actually matched and applies the pure decision
/// function to the context the authentication stage produced.
pub async fn authorize(
    State(state): State<Arc<AppState>>,
    matched: MatchedPath,
    raw_params: RawPathParams,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    let requirement = state.permissions.requirement(req.method(), matched.as_str());
    let params: Vec<(&str, &str)> = raw_params.iter().collect();

    if !is_authorized(requirement, &ctx.claims, &ctx.account_id, &params) {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}
