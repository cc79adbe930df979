//! Credential endpoints.
//!
//! - `POST /api/auth/login`: verify a username/password pair
//! - `PUT /api/auth/password`: change a password after re-verifying the
//!   current one
//! - `POST /api/auth/user`: create an account, or reset its password
//!
//! PBKDF2 work runs on a blocking thread; at the configured iteration
//! count it takes long enough to stall the runtime otherwise.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::ApiContext;
use crate::auth;
use crate::db::repository;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialsPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordChangePayload {
    pub username: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".into())
}

fn wrong_current_password() -> ApiError {
    ApiError::Unauthorized("Current password is incorrect".into())
}

async fn verify_blocking(password: String, stored: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || auth::verify_password(&password, &stored))
        .await
        .map_err(|e| ApiError::Store(format!("Task join error: {e}")))
}

async fn hash_blocking(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| ApiError::Store(format!("Task join error: {e}")))
}

/// `POST /api/auth/login`: check a credential pair. A missing account
/// and a wrong password produce the same response.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let client = ctx.db.client().await?;
    let user = repository::get_user_by_username(&client, &username)
        .await?
        .ok_or_else(invalid_credentials)?;
    if !verify_blocking(password, user.password_hash).await? {
        return Err(invalid_credentials());
    }

    Ok(Json(LoginResponse {
        success: true,
        username: user.username,
        message: "Login successful".into(),
    }))
}

/// `PUT /api/auth/password`: re-verify the current password, then store
/// a fresh hash of the new one.
pub async fn change_password(
    State(ctx): State<ApiContext>,
    Json(payload): Json<PasswordChangePayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    let new_password = match payload.new_password {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::Validation("New password is required".into())),
    };
    let username = payload.username.unwrap_or_default();
    let current = payload.current_password.unwrap_or_default();

    let client = ctx.db.client().await?;
    let user = repository::get_user_by_username(&client, &username)
        .await?
        .ok_or_else(wrong_current_password)?;
    if !verify_blocking(current, user.password_hash).await? {
        return Err(wrong_current_password());
    }

    let hash = hash_blocking(new_password).await?;
    repository::update_user_password(&client, &user.username, &hash).await?;
    Ok(Json(MessageResponse {
        message: "Password updated successfully".into(),
    }))
}

/// `POST /api/auth/user`: upsert an account. This is also how the first
/// account is provisioned on a fresh install.
pub async fn upsert_user(
    State(ctx): State<ApiContext>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    }

    let hash = hash_blocking(password).await?;
    let client = ctx.db.client().await?;
    if repository::upsert_user(&client, &username, &hash).await? {
        Ok((
            StatusCode::CREATED,
            Json(MessageResponse {
                message: "User created successfully".into(),
            }),
        ))
    } else {
        Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: "User updated successfully".into(),
            }),
        ))
    }
}
