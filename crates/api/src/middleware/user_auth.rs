//! JWT authentication middleware.
//!
//! `require_auth` validates the Bearer token and stores the caller's identity
//! in request extensions; `require_organizer` additionally gates routes to the
//! organizer role. Ownership checks against a specific event stay in the
//! handlers, which have the event row at hand.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use domain::models::user::UserRole;
use shared::jwt::JwtConfig;

/// Authenticated caller identity extracted from the JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// Role carried by the token at issue time.
    pub role: UserRole,
}

impl AuthUser {
    /// Validates an access token and returns the caller's identity.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token".to_string())?;

        let role =
            UserRole::parse(&claims.role).ok_or_else(|| "Invalid role in token".to_string())?;

        Ok(AuthUser { user_id, role })
    }
}

/// Middleware that requires JWT authentication.
///
/// Validates the Bearer token in the Authorization header and rejects
/// requests without a valid token. The authenticated identity is stored in
/// request extensions for downstream handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    match AuthUser::validate(&state.jwt, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

/// Middleware that requires the organizer role.
///
/// Must run after `require_auth`, which inserts the `AuthUser` extension.
pub async fn require_organizer(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<AuthUser>() {
        Some(auth) if auth.role == UserRole::Organizer => next.run(req).await,
        Some(_) => forbidden_response("Organizer role required"),
        None => unauthorized_response("Authentication required"),
    }
}

/// Helper to create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "success": false,
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create a forbidden response.
fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "success": false,
            "message": message
        })),
    )
        .into_response()
}
