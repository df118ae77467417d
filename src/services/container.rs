//! Service Container - Centralized service access.
//!
//! Builds every service over one shared Unit of Work and hands them out
//! as trait objects.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, ClientRegistry, ProductCatalog, ProductService, SeedService,
    Seeder,
};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get product service
    fn products(&self) -> Arc<dyn ProductService>;

    /// Get seed service
    fn seed(&self) -> Arc<dyn SeedService>;

    /// Get the connected-clients registry
    fn clients(&self) -> Arc<ClientRegistry>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    product_service: Arc<dyn ProductService>,
    seed_service: Arc<dyn SeedService>,
    clients: Arc<ClientRegistry>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: Arc<sea_orm::DatabaseConnection>, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            product_service: Arc::new(ProductCatalog::new(uow.clone())),
            seed_service: Arc::new(Seeder::new(uow)),
            clients: Arc::new(ClientRegistry::default()),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn seed(&self) -> Arc<dyn SeedService> {
        self.seed_service.clone()
    }

    fn clients(&self) -> Arc<ClientRegistry> {
        self.clients.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_container_shares_one_registry() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let config = Config::new(
            "postgres://unused".to_string(),
            "test-secret-key-for-testing-only-32chars".to_string(),
        );
        let services = Services::from_connection(Arc::new(db), config);

        assert!(Arc::ptr_eq(&services.clients(), &services.clients()));
    }
}
