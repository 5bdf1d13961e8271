//! Registration, login and the current session.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use perspectra_common::{user::normalize_email, ApiError, Profile, User, UserInfo};
use perspectra_db::DbError;

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::extract::ApiJson;
use crate::state::SharedState;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub expires_at: DateTime<Utc>,
}

fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    let email = req.email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'));
    if !well_formed {
        return Err(ApiError::Validation("A valid email address is required".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    Ok(())
}

fn token_response(state: &SharedState, user: &User) -> Result<TokenResponse, ApiError> {
    let issued = state.jwt.issue(user.id, &user.email)?;
    Ok(TokenResponse {
        access_token: issued.token,
        token_type: "bearer".to_string(),
        user_id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        expires_at: issued.expires_at,
    })
}

/// POST /auth/register
pub async fn register(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    validate_registration(&req)?;

    let email = normalize_email(&req.email);
    if state.store.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let user = User::new(&email, &req.name, hash_password(&req.password)?);
    state.store.users.create(&user).await.map_err(|e| match e {
        DbError::Duplicate(_) => ApiError::BadRequest("Email already registered".to_string()),
        other => other.into(),
    })?;
    state.store.profiles.save(&Profile::new(user.id)).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(token_response(&state, &user)?)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .store
        .users
        .find_by_email(&normalize_email(&req.email))
        .await?
        .ok_or_else(invalid)?;
    if !verify_password(&req.password, &user.password_hash) {
        tracing::debug!(user_id = %user.id, "login with wrong password");
        return Err(invalid());
    }

    Ok(Json(token_response(&state, &user)?))
}

/// GET /auth/me
pub async fn me(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<UserInfo>, ApiError> {
    let user = state
        .store
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(ApiError::invalid_token)?;
    Ok(Json(user.info()))
}
