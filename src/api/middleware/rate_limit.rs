use crate::error::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc};

pub type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

pub fn build_rate_limiter(per_minute: u32) -> SharedRateLimiter {
    let quota = Quota::per_minute(NonZeroU32::new(per_minute.max(1)).expect("quota is non-zero"));
    Arc::new(RateLimiter::direct(quota))
}

pub async fn rate_limit(
    State(limiter): State<SharedRateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if limiter.check().is_err() {
        return Err(AppError::TooManyRequests);
    }
    Ok(next.run(req).await)
}
