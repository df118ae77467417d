//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, product_handler, seed_handler};
use crate::domain::{CreateProduct, Gender, ProductResponse, UpdateProduct, UserResponse, UserRole};
use crate::services::{AuthResponse, LoginResponse};
use crate::types::MessageResponse;

/// OpenAPI documentation for the Shop API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "Product catalog with JWT authentication and a live clients channel"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::check_status,
        // Product endpoints
        product_handler::create_product,
        product_handler::list_products,
        product_handler::get_product,
        product_handler::update_product,
        product_handler::delete_product,
        // Seed
        seed_handler::execute_seed,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            Gender,
            CreateProduct,
            UpdateProduct,
            ProductResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            AuthResponse,
            LoginResponse,
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token renewal"),
        (name = "Products", description = "Product catalog"),
        (name = "Seed", description = "Development data reset")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
