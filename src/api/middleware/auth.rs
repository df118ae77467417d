//! JWT authentication middleware and role checks.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult};

/// Authenticated user resolved from the bearer token
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Unauthorized"))
}

/// JWT authentication middleware.
///
/// Verifies the token, loads the user it names and rejects inactive
/// accounts, then injects [`CurrentUser`] into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let user = state.auth_service.authenticate(token).await?;

    tracing::debug!(user_id = %user.id, "Request authenticated");
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Pass when the user holds any of `roles`; an empty list admits everyone.
pub fn require_roles(user: &User, roles: &[UserRole]) -> Result<(), AppError> {
    if user.has_any_role(roles) {
        return Ok(());
    }

    let wanted = roles
        .iter()
        .map(UserRole::as_str)
        .collect::<Vec<_>>()
        .join(",");
    Err(AppError::forbidden(format!(
        "User {} need a valid role: [{}]",
        user.full_name, wanted
    )))
}

/// Route layer admitting only users holding one of `roles`.
///
/// Runs inside [`auth_middleware`] and before the handler's extractors, so a
/// caller without the role is refused before the path or body is parsed.
pub async fn role_guard(
    State(roles): State<&'static [UserRole]>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let CurrentUser(user) = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AppError::unauthorized("Unauthorized"))?;
    require_roles(user, roles)?;

    Ok(next.run(request).await)
}
