//! HTTP request handlers.

pub mod auth_handler;
pub mod messages_ws_handler;
pub mod product_handler;
pub mod seed_handler;

pub use auth_handler::auth_routes;
pub use messages_ws_handler::messages_ws_routes;
pub use product_handler::product_routes;
pub use seed_handler::seed_routes;
