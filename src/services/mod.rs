//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod auth_service;
mod connected_clients;
pub mod container;
mod product_service;
pub mod seed_data;
mod seed_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthResponse, AuthService, Authenticator, Claims, LoginResponse};
pub use connected_clients::{ClientRegistry, Registration, ServerEvent};
pub use product_service::{ProductCatalog, ProductService};
pub use seed_service::{SeedReport, SeedService, Seeder};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
