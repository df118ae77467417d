//! Authentication handlers.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::validate_password_policy;
use crate::errors::AppResult;
use crate::services::{AuthResponse, LoginResponse};
use crate::types::Created;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// User email address
    #[validate(email(message = "email must be an email"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// 6-50 characters with an uppercase letter, a lowercase letter and a digit or symbol
    #[validate(custom(function = "validate_password_policy"))]
    #[schema(example = "Abc123", min_length = 6, max_length = 50)]
    pub password: String,
    /// User display name
    #[validate(length(min = 1, message = "fullName must be longer than or equal to 1 characters"))]
    #[schema(example = "John Doe")]
    pub full_name: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "email must be an email"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password
    #[validate(custom(function = "validate_password_policy"))]
    #[schema(example = "Abc123")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/check-status", get(check_status))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation error or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<AuthResponse>> {
    let response = state
        .auth_service
        .register(payload.email, payload.password, payload.full_name)
        .await?;

    Ok(Created(response))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(response))
}

/// Return the current user with a renewed token
#[utoipa::path(
    get,
    path = "/api/auth/check-status",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token renewed", body = AuthResponse),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn check_status(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Json<AuthResponse>> {
    let response = state.auth_service.check_status(user)?;
    Ok(Json(response))
}
