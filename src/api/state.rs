//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, ClientRegistry, ProductService, SeedService, ServiceContainer, Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Product catalog service
    pub product_service: Arc<dyn ProductService>,
    /// Database seeding
    pub seed_service: Arc<dyn SeedService>,
    /// Live WebSocket connections
    pub clients: Arc<ClientRegistry>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, database)
    }

    /// Pull every service out of a container.
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            product_service: container.products(),
            seed_service: container.seed(),
            clients: container.clients(),
            database,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        product_service: Arc<dyn ProductService>,
        seed_service: Arc<dyn SeedService>,
        clients: Arc<ClientRegistry>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            product_service,
            seed_service,
            clients,
            database,
        }
    }
}
