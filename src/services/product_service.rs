//! Product service - Catalog use cases.
//!
//! Reads always state their relation policy explicitly. Writes that touch
//! more than one table run inside a Unit of Work transaction.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CreateProduct, Product, UpdateProduct, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{Relations, UnitOfWork};
use crate::types::PaginationParams;

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Insert a product and its images, owned by `owner`
    async fn create(&self, input: CreateProduct, owner: User) -> AppResult<Product>;

    /// One page of products with images and owner
    async fn find_all(&self, pagination: PaginationParams) -> AppResult<Vec<Product>>;

    /// Look up by id when `term` is a UUID, otherwise by title or slug.
    async fn find_one(&self, term: &str) -> AppResult<Product>;

    /// Merge `changes` into the product, replacing images when given.
    async fn update(&self, id: Uuid, changes: UpdateProduct, editor: User) -> AppResult<Product>;

    /// Delete a product and its images
    async fn remove(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ProductService using Unit of Work.
pub struct ProductCatalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductCatalog<U> {
    /// Create new product service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_plain(&self, id: Uuid) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id, Relations::Skip)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product with id {} not found", id)))
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductCatalog<U> {
    async fn create(&self, input: CreateProduct, owner: User) -> AppResult<Product> {
        let (mut product, urls) = input.into_product(Some(owner.id));

        let mut product = crate::with_transaction!(self.uow, |ctx| {
            ctx.products().insert(&product).await?;
            product.images = ctx.products().insert_images(product.id, &urls).await?;
            Ok(product)
        })?;

        tracing::info!(product_id = %product.id, owner_id = %owner.id, "Product created");

        product.user = Some(owner);
        Ok(product)
    }

    async fn find_all(&self, pagination: PaginationParams) -> AppResult<Vec<Product>> {
        self.uow
            .products()
            .find_all(pagination.limit(), pagination.offset(), Relations::Eager)
            .await
    }

    async fn find_one(&self, term: &str) -> AppResult<Product> {
        let found = match Uuid::parse_str(term) {
            Ok(id) => self.uow.products().find_by_id(id, Relations::Eager).await?,
            Err(_) => self.uow.products().find_by_term(term, Relations::Eager).await?,
        };

        found.ok_or_else(|| AppError::not_found(format!("Product with {} not found", term)))
    }

    async fn update(
        &self,
        id: Uuid,
        mut changes: UpdateProduct,
        editor: User,
    ) -> AppResult<Product> {
        let mut product = self.find_plain(id).await?;

        let images = changes.images.take();
        product.apply(changes);
        product.user_id = Some(editor.id);

        crate::with_transaction!(self.uow, |ctx| {
            if let Some(urls) = images {
                ctx.products().delete_images(id).await?;
                ctx.products().insert_images(id, &urls).await?;
            }
            ctx.products().update(&product).await
        })?;

        tracing::info!(product_id = %id, editor_id = %editor.id, "Product updated");

        self.find_one(&id.to_string()).await
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        let product = self.find_plain(id).await?;
        self.uow.products().delete(product.id).await?;

        tracing::info!(product_id = %id, "Product removed");
        Ok(())
    }
}
