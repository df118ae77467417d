//! API middleware.

mod auth;

pub use auth::{auth_middleware, bearer_token, require_roles, role_guard, CurrentUser};
