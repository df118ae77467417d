//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod password;
pub mod product;
pub mod user;

pub use password::{validate_password_policy, Password};
pub use product::{
    slugify, CreateProduct, Gender, Product, ProductImage, ProductResponse, UpdateProduct,
};
pub use user::{normalize_email, Credentials, NewUser, User, UserResponse, UserRole};
