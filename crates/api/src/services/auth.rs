//! Authentication service for user registration, login, and token refresh.

use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use domain::models::user::{User, UserRole};
use persistence::repositories::UserRepository;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, validate_password_strength, verify_password, PasswordError};

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password does not meet requirements")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Result of a successful token refresh.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    /// Creates a new AuthService.
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Registers a new account and issues its first token pair.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<AuthResult, AuthError> {
        validate_password_strength(password).map_err(AuthError::WeakPassword)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let entity = self
            .users
            .create(name, email, &password_hash, role.as_str())
            .await?;

        let user: User = entity.into();
        self.issue_tokens(user)
    }

    /// Authenticates by email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let entity = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &entity.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let user: User = entity.into();
        self.issue_tokens(user)
    }

    /// Exchanges a valid refresh token for a new token pair.
    ///
    /// The user row is re-read so a role change takes effect on refresh.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        let claims = self.jwt.validate_refresh_token(refresh_token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::UserNotFound)?;

        let entity = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let user: User = entity.into();
        let result = self.issue_tokens(user)?;

        Ok(RefreshResult {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            expires_in: result.expires_in,
        })
    }

    /// Loads the profile for an authenticated user.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        let entity = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(entity.into())
    }

    fn issue_tokens(&self, user: User) -> Result<AuthResult, AuthError> {
        let (access_token, _) = self.jwt.generate_access_token(user.id, user.role.as_str())?;
        let (refresh_token, _) = self
            .jwt
            .generate_refresh_token(user.id, user.role.as_str())?;

        Ok(AuthResult {
            user,
            access_token,
            refresh_token,
            expires_in: self.jwt.access_token_expiry_secs,
        })
    }
}
