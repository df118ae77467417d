//! Shop API - Product catalog backend
//!
//! JWT-authenticated REST API over a Postgres product catalog, plus a
//! WebSocket channel that tracks connected clients.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, products, passwords and slugs
//! - **services**: Auth, catalog, seeding and the connected-clients registry
//! - **infra**: Database, repositories and the Unit of Work
//! - **api**: HTTP and WebSocket handlers, middleware and routes
//! - **types**: Shared request/response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Load fixture users and products
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Product, User, UserRole};
pub use errors::{AppError, AppResult};
