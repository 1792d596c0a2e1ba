use crate::domain::models::account::Account;
use serde::Serialize;

/// Uniform success envelope. Errors use the mirrored shape produced by
/// `AppError::into_response`.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            code: 200,
            message: "OK".to_string(),
            data,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            success: true,
            code: 201,
            message: "Created".to_string(),
            data,
        }
    }
}

#[derive(Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub account: Account,
}

/// Admin-created accounts ship a generated one-time password.
#[derive(Serialize)]
pub struct AccountCreatedPayload {
    pub account: Account,
    pub generated_password: String,
}
