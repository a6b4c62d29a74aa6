//! Authentication endpoint handlers.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::services::auth::AuthResult;
use domain::models::user::{UserResponse, UserRole};

/// Request payload for account registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub password: String,

    /// Defaults to the regular user role when omitted.
    pub role: Option<UserRole>,
}

/// Request payload for login.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request payload for token refresh.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response payload carrying a token pair and the account it belongs to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            user: result.user.into(),
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            expires_in: result.expires_in,
        }
    }
}

/// Response payload for a refreshed token pair.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Register a new account.
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<DataResponse<AuthResponse>>), ApiError> {
    payload.validate()?;

    let role = payload.role.unwrap_or(UserRole::User);
    let result = state
        .auth
        .register(&payload.name, &payload.email, &payload.password, role)
        .await?;

    tracing::info!(user_id = %result.user.id, role = role.as_str(), "User registered");

    Ok((StatusCode::CREATED, Json(DataResponse::new(result.into()))))
}

/// Authenticate with email and password.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<DataResponse<AuthResponse>>, ApiError> {
    payload.validate()?;

    let result = state.auth.login(&payload.email, &payload.password).await?;

    tracing::info!(user_id = %result.user.id, "User logged in");

    Ok(Json(DataResponse::new(result.into())))
}

/// Exchange a refresh token for a new token pair.
///
/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<DataResponse<TokenResponse>>, ApiError> {
    let result = state.auth.refresh(&payload.refresh_token).await?;

    Ok(Json(DataResponse::new(TokenResponse {
        access_token: result.access_token,
        refresh_token: result.refresh_token,
        expires_in: result.expires_in,
    })))
}

/// Return the authenticated user's profile.
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DataResponse<UserResponse>>, ApiError> {
    let user = state.auth.current_user(auth.user_id).await?;
    Ok(Json(DataResponse::new(user.into())))
}
