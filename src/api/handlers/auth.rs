use crate::api::dtos::requests::{LoginRequest, SignupRequest};
use crate::api::dtos::responses::{ApiResponse, AuthPayload};
use crate::domain::models::account::{Account, AccountStatus};
use crate::error::AppError;
use crate::state::AppState;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rand::rngs::OsRng;
use std::sync::Arc;
use tracing::info;

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let full_name = payload.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(AppError::Validation("full_name must not be empty".into()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::Validation("email is not valid".into()));
    }
    if payload.password.len() < 8 {
        return Err(AppError::Validation("password must be at least 8 characters".into()));
    }

    if state.account_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let account = Account::new(full_name, payload.email, payload.phone, password_hash);
    let created = state.account_repo.create(&account).await?;

    let token = state.identity.issue(&created)?;

    info!("Account signed up: {}", created.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(AuthPayload { token, account: created })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .account_repo
        .find_by_email(&payload.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&account.password_hash).map_err(|_| AppError::Internal)?;

    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)?;

    if account.status != AccountStatus::Active {
        return Err(AppError::Forbidden(format!("Account is {}", account.status)));
    }

    let token = state.identity.issue(&account)?;

    info!("Account logged in: {}", account.id);

    Ok(Json(ApiResponse::ok(AuthPayload { token, account })))
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string())
}
