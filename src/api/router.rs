use crate::api::handlers::{account, admin, auth, health, member, profile, workspace};
use crate::api::middleware::{
    account_status::require_active_account,
    authenticate::authenticate,
    authorize::authorize,
    rate_limit::{build_rate_limiter, rate_limit},
};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::Request,
    http::{header::CONTENT_TYPE, Method, Response, StatusCode},
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    classify::ServerErrorsFailureClass,
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

/// Canonical route table. The permission registry is validated against
/// this list at bootstrap; keep it in sync with `create_router`.
pub fn route_table() -> Vec<(Method, &'static str)> {
    vec![
        (Method::GET, "/health"),
        (Method::POST, "/api/v1/auth/signup"),
        (Method::POST, "/api/v1/auth/login"),
        (Method::GET, "/api/v1/me"),
        (Method::GET, "/api/v1/accounts/{id}"),
        (Method::GET, "/api/v1/workspaces"),
        (Method::POST, "/api/v1/workspaces"),
        (Method::GET, "/api/v1/workspaces/{id}"),
        (Method::PATCH, "/api/v1/workspaces/{id}"),
        (Method::DELETE, "/api/v1/workspaces/{id}"),
        (Method::PATCH, "/api/v1/workspaces/{id}/profile"),
        (Method::GET, "/api/v1/workspaces/{id}/members"),
        (Method::POST, "/api/v1/workspaces/{id}/members"),
        (Method::PUT, "/api/v1/workspaces/{id}/members/{member_id}"),
        (Method::DELETE, "/api/v1/workspaces/{id}/members/{member_id}"),
        (Method::GET, "/api/v1/admin/accounts"),
        (Method::POST, "/api/v1/admin/accounts"),
        (Method::PUT, "/api/v1/admin/accounts/{id}/role"),
        (Method::PUT, "/api/v1/admin/accounts/{id}/status"),
        (Method::GET, "/api/v1/admin/workspaces"),
        (Method::GET, "/api/v1/admin/memberships"),
        (Method::GET, "/api/v1/admin/audit-logs"),
        (Method::GET, "/api/v1/admin/audit-logs/stats"),
    ]
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let standard_limiter = build_rate_limiter(state.config.rate_limit_per_minute);
    let admin_limiter = build_rate_limiter(state.config.admin_rate_limit_per_minute);

    let admin_routes = Router::new()
        .route("/accounts", get(admin::list_accounts).post(admin::create_account))
        .route("/accounts/{id}/role", put(admin::update_account_role))
        .route("/accounts/{id}/status", put(admin::update_account_status))
        .route("/workspaces", get(admin::list_workspaces))
        .route("/memberships", get(admin::list_memberships))
        .route("/audit-logs", get(admin::list_audit_logs))
        .route("/audit-logs/stats", get(admin::audit_log_stats))
        .layer(middleware::from_fn_with_state(state.clone(), require_active_account))
        .layer(middleware::from_fn_with_state(admin_limiter, rate_limit));

    let api_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/me", get(account::get_me))
        .route("/accounts/{id}", get(account::get_account))
        .route("/workspaces", get(workspace::list_workspaces).post(workspace::create_workspace))
        .route(
            "/workspaces/{id}",
            get(workspace::get_workspace)
                .patch(workspace::update_workspace)
                .delete(workspace::delete_workspace),
        )
        .route("/workspaces/{id}/profile", patch(profile::update_profile))
        .route("/workspaces/{id}/members", get(member::list_members).post(member::add_member))
        .route(
            "/workspaces/{id}/members/{member_id}",
            put(member::update_member_role).delete(member::remove_member),
        )
        .nest("/admin", admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(middleware::from_fn_with_state(standard_limiter, rate_limit));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        account_id = tracing::field::Empty,
                        workspace_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                }),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// A panicking handler becomes a generic 500 envelope; the panic payload
/// is logged, never leaked to the client.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };

    error!("handler panicked: {}", detail);

    let body = serde_json::json!({
        "success": false,
        "code": 500,
        "message": "Internal server error",
        "error": "INTERNAL_ERROR",
    });

    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("static panic response")
}
