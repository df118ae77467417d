//! Authentication service - Registration, login and token handling.
//!
//! Password hashing lives in the domain `Password` value object; storage
//! goes through the Unit of Work.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{normalize_email, NewUser, Password, User, UserResponse};
use crate::errors::{AppError, AppResult, CredentialField};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// A user together with a freshly signed token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Login result. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: Uuid,
    #[schema(example = "user@example.com")]
    pub email: String,
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Hash the password, insert the user and sign a token for it.
    async fn register(
        &self,
        email: String,
        password: String,
        full_name: String,
    ) -> AppResult<AuthResponse>;

    /// Check credentials and sign a token
    async fn login(&self, email: String, password: String) -> AppResult<LoginResponse>;

    /// Re-issue a token for an already authenticated user
    fn check_status(&self, user: User) -> AppResult<AuthResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to an active user.
    async fn authenticate(&self, token: &str) -> AppResult<User>;
}

fn sign_token(user_id: Uuid, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        id: user_id,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(token)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        email: String,
        password: String,
        full_name: String,
    ) -> AppResult<AuthResponse> {
        // Duplicate emails are rejected by the unique index, see AppError::from(DbErr)
        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser::new(&email, password_hash, full_name))
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        let token = sign_token(user.id, &self.config)?;
        Ok(AuthResponse {
            user: UserResponse::from(user),
            token,
        })
    }

    async fn login(&self, email: String, password: String) -> AppResult<LoginResponse> {
        let email = normalize_email(&email);
        let credentials = self
            .uow
            .users()
            .find_credentials_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials(CredentialField::Email))?;

        if !Password::from_hash(credentials.password_hash).verify(&password) {
            return Err(AppError::InvalidCredentials(CredentialField::Password));
        }

        Ok(LoginResponse {
            token: sign_token(credentials.id, &self.config)?,
            id: credentials.id,
            email: credentials.email,
        })
    }

    fn check_status(&self, user: User) -> AppResult<AuthResponse> {
        let token = sign_token(user.id, &self.config)?;
        Ok(AuthResponse {
            user: UserResponse::from(user),
            token,
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.verify_token(token)?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Token not valid"))?;

        if !user.is_active {
            return Err(AppError::unauthorized("User is inactive, talk with an admin"));
        }

        Ok(user)
    }
}
