//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{Credentials, NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Load only `id`, `email` and the password hash for a login attempt.
    async fn find_credentials_by_email(&self, email: &str) -> AppResult<Option<Credentials>>;

    /// Insert a new user. A taken email surfaces as a unique violation.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;
}

#[derive(Debug, FromQueryResult)]
struct CredentialsRow {
    id: Uuid,
    email: String,
    password: String,
}

impl From<CredentialsRow> for Credentials {
    fn from(row: CredentialsRow) -> Self {
        Credentials {
            id: row.id,
            email: row.email,
            password_hash: row.password,
        }
    }
}

/// Map a [`NewUser`] onto an insertable row.
pub(crate) fn new_user_model(new_user: NewUser) -> ActiveModel {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(new_user.email),
        password: Set(new_user.password_hash),
        full_name: Set(new_user.full_name),
        is_active: Set(true),
        roles: Set(new_user.roles.into_iter().map(String::from).collect()),
    }
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_credentials_by_email(&self, email: &str) -> AppResult<Option<Credentials>> {
        let row = UserEntity::find()
            .select_only()
            .columns([user::Column::Id, user::Column::Email, user::Column::Password])
            .filter(user::Column::Email.eq(email))
            .into_model::<CredentialsRow>()
            .one(&*self.db)
            .await
            .map_err(AppError::from)?;

        Ok(row.map(Credentials::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let model = new_user_model(new_user)
            .insert(&*self.db)
            .await
            .map_err(AppError::from)?;

        Ok(User::from(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user_row(email: &str) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password: "$argon2id$stub".to_string(),
            full_name: "Stored User".to_string(),
            is_active: true,
            roles: vec!["admin".to_string(), "user".to_string()],
        }
    }

    #[tokio::test]
    async fn test_find_by_id_maps_roles() {
        let row = user_row("stored@example.com");
        let id = row.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();

        let user = UserStore::new(Arc::new(db)).find_by_id(id).await.unwrap().unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.roles, vec![UserRole::Admin, UserRole::User]);
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_find_credentials_projects_hash() {
        let row = user_row("login@example.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row.clone()]])
            .into_connection();

        let creds = UserStore::new(Arc::new(db))
            .find_credentials_by_email("login@example.com")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(creds.id, row.id);
        assert_eq!(creds.password_hash, row.password);
    }

    #[tokio::test]
    async fn test_find_credentials_unknown_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let creds = UserStore::new(Arc::new(db))
            .find_credentials_by_email("nobody@example.com")
            .await
            .unwrap();

        assert!(creds.is_none());
    }

    #[tokio::test]
    async fn test_create_returns_inserted_user() {
        let row = user_row("new@example.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row.clone()]])
            .into_connection();

        let new_user = NewUser::new("new@example.com", "hash".into(), "Stored User".into());
        let user = UserStore::new(Arc::new(db)).create(new_user).await.unwrap();

        assert_eq!(user.email, "new@example.com");
        assert!(user.is_active);
    }
}
