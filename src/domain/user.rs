//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_SUPER_USER, ROLE_USER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    Admin,
    SuperUser,
    User,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::SuperUser => ROLE_SUPER_USER,
            UserRole::User => ROLE_USER,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            ROLE_SUPER_USER => UserRole::SuperUser,
            _ => UserRole::User,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim and lowercase an email address before it is stored or looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub is_active: bool,
    pub roles: Vec<UserRole>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(UserRole::is_admin)
    }

    /// True when the user holds at least one of `required`.
    ///
    /// An empty requirement admits every user.
    pub fn has_any_role(&self, required: &[UserRole]) -> bool {
        required.is_empty() || self.roles.iter().any(|role| required.contains(role))
    }
}

/// Data needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub roles: Vec<UserRole>,
}

impl NewUser {
    /// New user with the default role. The email is normalized here.
    pub fn new(email: &str, password_hash: String, full_name: String) -> Self {
        Self {
            email: normalize_email(email),
            password_hash,
            full_name,
            roles: vec![UserRole::User],
        }
    }

    pub fn with_roles(mut self, roles: Vec<UserRole>) -> Self {
        self.roles = roles;
        self
    }
}

/// Login projection: just enough of a user to check a password.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User display name
    #[schema(example = "John Doe")]
    pub full_name: String,
    /// Whether the account may sign in
    pub is_active: bool,
    /// Granted roles
    pub roles: Vec<UserRole>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            roles: user.roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_roles(roles: Vec<UserRole>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "hashed".to_string(),
            full_name: "Test User".to_string(),
            is_active: true,
            roles,
        }
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(UserRole::SuperUser.to_string(), "super-user");
        assert_eq!(
            serde_json::to_string(&UserRole::SuperUser).unwrap(),
            "\"super-user\""
        );
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("unknown"), UserRole::User);
    }

    #[test]
    fn test_has_any_role() {
        let user = user_with_roles(vec![UserRole::User, UserRole::SuperUser]);

        assert!(user.has_any_role(&[]));
        assert!(user.has_any_role(&[UserRole::SuperUser, UserRole::Admin]));
        assert!(!user.has_any_role(&[UserRole::Admin]));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_new_user_normalizes_email() {
        let new_user = NewUser::new("  Mixed.Case@Example.COM ", "hash".into(), "Name".into());

        assert_eq!(new_user.email, "mixed.case@example.com");
        assert_eq!(new_user.roles, vec![UserRole::User]);
    }

    #[test]
    fn test_response_hides_password_and_uses_camel_case() {
        let user = user_with_roles(vec![UserRole::Admin]);
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["fullName"], "Test User");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["roles"][0], "admin");
    }
}
