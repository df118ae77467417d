//! Product aggregate: the product row, its ordered images and its owner.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::user::{User, UserResponse};

/// Target audience of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Kid,
    Unisex,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "men",
            Gender::Women => "women",
            Gender::Kid => "kid",
            Gender::Unisex => "unisex",
        }
    }
}

impl From<&str> for Gender {
    fn from(s: &str) -> Self {
        match s {
            "men" => Gender::Men,
            "women" => Gender::Women,
            "kid" => Gender::Kid,
            _ => Gender::Unisex,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a title or explicit slug: lowercase, spaces become `_`, apostrophes dropped.
pub fn slugify(input: &str) -> String {
    input.to_lowercase().replace(' ', "_").replace('\'', "")
}

/// An image row owned by a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductImage {
    pub id: i32,
    pub url: String,
}

/// Product domain entity
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: Gender,
    pub tags: Vec<String>,
    pub user_id: Option<Uuid>,
    /// Ordered by insertion. Empty unless relations were loaded.
    pub images: Vec<ProductImage>,
    /// Owner, present only when relations were loaded.
    pub user: Option<User>,
}

impl Product {
    /// Image URLs in display order.
    pub fn image_urls(&self) -> Vec<String> {
        self.images.iter().map(|image| image.url.clone()).collect()
    }

    /// Merge an update into this product and re-derive the slug.
    ///
    /// `changes.images` is not touched here; image replacement belongs to the
    /// caller's transaction.
    pub fn apply(&mut self, changes: UpdateProduct) {
        let title_changed = changes.title.is_some();

        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(stock) = changes.stock {
            self.stock = stock;
        }
        if let Some(sizes) = changes.sizes {
            self.sizes = sizes;
        }
        if let Some(gender) = changes.gender {
            self.gender = gender;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }

        let source = match changes.slug.filter(|s| !s.is_empty()) {
            Some(explicit) => explicit,
            None if title_changed => self.title.clone(),
            None => self.slug.clone(),
        };
        self.slug = slugify(&source);
    }
}

/// Product creation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    /// Product title (unique)
    #[validate(length(min = 1, message = "title must be longer than or equal to 1 characters"))]
    #[schema(example = "Men's Chill Crew Neck Sweatshirt", min_length = 1)]
    pub title: String,
    /// Price, must be positive when given
    #[validate(range(exclusive_min = 0.0, message = "price must be a positive number"))]
    #[schema(example = 75.0)]
    pub price: Option<f64>,
    pub description: Option<String>,
    /// Explicit slug; derived from the title when absent
    #[schema(example = "mens_chill_crew_neck_sweatshirt")]
    pub slug: Option<String>,
    #[validate(range(min = 1, message = "stock must be a positive number"))]
    #[schema(example = 10)]
    pub stock: Option<i32>,
    #[schema(example = json!(["S", "M", "L"]))]
    pub sizes: Vec<String>,
    pub gender: Gender,
    pub tags: Option<Vec<String>>,
    /// Image URLs, kept in the given order
    pub images: Option<Vec<String>>,
}

impl CreateProduct {
    /// Build the product row and hand back the image URLs to insert with it.
    pub fn into_product(self, owner: Option<Uuid>) -> (Product, Vec<String>) {
        let slug_source = match self.slug.filter(|s| !s.is_empty()) {
            Some(explicit) => explicit,
            None => self.title.clone(),
        };

        let product = Product {
            id: Uuid::new_v4(),
            slug: slugify(&slug_source),
            title: self.title,
            price: self.price.unwrap_or(0.0),
            description: self.description,
            stock: self.stock.unwrap_or(0),
            sizes: self.sizes,
            gender: self.gender,
            tags: self.tags.unwrap_or_default(),
            user_id: owner,
            images: Vec::new(),
            user: None,
        };

        (product, self.images.unwrap_or_default())
    }
}

/// Partial product update; every field is optional
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, message = "title must be longer than or equal to 1 characters"))]
    pub title: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "price must be a positive number"))]
    pub price: Option<f64>,
    pub description: Option<String>,
    pub slug: Option<String>,
    #[validate(range(min = 1, message = "stock must be a positive number"))]
    pub stock: Option<i32>,
    pub sizes: Option<Vec<String>>,
    pub gender: Option<Gender>,
    pub tags: Option<Vec<String>>,
    /// When present, replaces every existing image
    pub images: Option<Vec<String>>,
}

/// Product as returned to clients: images flattened to URLs.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    #[schema(example = "Men's Chill Crew Neck Sweatshirt")]
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    #[schema(example = "mens_chill_crew_neck_sweatshirt")]
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: Gender,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub user: Option<UserResponse>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let images = product.image_urls();
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            description: product.description,
            slug: product.slug,
            stock: product.stock,
            sizes: product.sizes,
            gender: product.gender,
            tags: product.tags,
            images,
            user: product.user.map(UserResponse::from),
        }
    }
}
