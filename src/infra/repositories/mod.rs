//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub mod entities;
mod product_repository;
mod user_repository;

pub use product_repository::{ProductRepository, ProductStore, Relations};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use product_repository::product_model;
pub(crate) use user_repository::new_user_model;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
