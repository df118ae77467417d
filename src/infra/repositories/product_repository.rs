//! Product repository implementation.
//!
//! Relation loading is never implicit: every read takes a [`Relations`]
//! argument and only [`Relations::Eager`] pulls images and the owner.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{product, product_image, user};
use crate::domain::{Product, ProductImage, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Whether a product read also fetches its images and owning user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relations {
    Skip,
    Eager,
}

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of products ordered by title
    async fn find_all(&self, limit: u64, offset: u64, relations: Relations)
        -> AppResult<Vec<Product>>;

    /// Find product by ID
    async fn find_by_id(&self, id: Uuid, relations: Relations) -> AppResult<Option<Product>>;

    /// Match `term` against the title (case-insensitive) or the slug.
    async fn find_by_term(&self, term: &str, relations: Relations) -> AppResult<Option<Product>>;

    /// Delete a product; its images go with it.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Map a product onto a full row. Used for both insert and update.
pub(crate) fn product_model(product: &Product) -> product::ActiveModel {
    product::ActiveModel {
        id: Set(product.id),
        title: Set(product.title.clone()),
        price: Set(product.price),
        description: Set(product.description.clone()),
        slug: Set(product.slug.clone()),
        stock: Set(product.stock),
        sizes: Set(product.sizes.clone()),
        gender: Set(product.gender.as_str().to_string()),
        tags: Set(product.tags.clone()),
        user_id: Set(product.user_id),
    }
}

/// Turn product rows into domain products, loading relations on request.
///
/// Eager loading costs one query for all images and one for all owners,
/// regardless of how many products are in `models`.
async fn hydrate<C>(
    db: &C,
    models: Vec<product::Model>,
    relations: Relations,
) -> AppResult<Vec<Product>>
where
    C: ConnectionTrait,
{
    if relations == Relations::Skip || models.is_empty() {
        return Ok(models.into_iter().map(Product::from).collect());
    }

    let images = models
        .load_many(
            product_image::Entity::find().order_by_asc(product_image::Column::Id),
            db,
        )
        .await
        .map_err(AppError::from)?;
    let owners = models
        .load_one(user::Entity, db)
        .await
        .map_err(AppError::from)?;

    let products = models
        .into_iter()
        .zip(images)
        .zip(owners)
        .map(|((model, images), owner)| {
            let mut product = Product::from(model);
            product.images = images.into_iter().map(ProductImage::from).collect();
            product.user = owner.map(User::from);
            product
        })
        .collect();

    Ok(products)
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: Arc<DatabaseConnection>,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn first(&self, found: Option<product::Model>, relations: Relations) -> AppResult<Option<Product>> {
        let Some(model) = found else {
            return Ok(None);
        };
        let mut products = hydrate(&*self.db, vec![model], relations).await?;
        Ok(products.pop())
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_all(
        &self,
        limit: u64,
        offset: u64,
        relations: Relations,
    ) -> AppResult<Vec<Product>> {
        let models = product::Entity::find()
            .order_by_asc(product::Column::Title)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await
            .map_err(AppError::from)?;

        hydrate(&*self.db, models, relations).await
    }

    async fn find_by_id(&self, id: Uuid, relations: Relations) -> AppResult<Option<Product>> {
        let found = product::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(AppError::from)?;

        self.first(found, relations).await
    }

    async fn find_by_term(&self, term: &str, relations: Relations) -> AppResult<Option<Product>> {
        let condition = Condition::any()
            .add(Expr::expr(Func::upper(Expr::col(product::Column::Title))).eq(term.to_uppercase()))
            .add(product::Column::Slug.eq(term.to_lowercase()));

        let found = product::Entity::find()
            .filter(condition)
            .one(&*self.db)
            .await
            .map_err(AppError::from)?;

        self.first(found, relations).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = product::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found(format!("Product with id {} not found", id)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn transaction_log(db: Arc<DatabaseConnection>) -> Vec<sea_orm::Transaction> {
        Arc::try_unwrap(db)
            .map_err(|_| "connection still shared")
            .unwrap()
            .into_transaction_log()
    }

    fn product_row(title: &str, owner: Uuid) -> product::Model {
        product::Model {
            id: Uuid::new_v4(),
            title: title.to_string(),
            price: 10.0,
            description: None,
            slug: crate::domain::slugify(title),
            stock: 3,
            sizes: vec!["M".to_string()],
            gender: "women".to_string(),
            tags: vec![],
            user_id: Some(owner),
        }
    }

    fn owner_row(id: Uuid) -> user::Model {
        user::Model {
            id,
            email: "owner@example.com".to_string(),
            password: "hash".to_string(),
            full_name: "Owner".to_string(),
            is_active: true,
            roles: vec!["admin".to_string()],
        }
    }

    fn image_row(id: i32, url: &str, product_id: Uuid) -> product_image::Model {
        product_image::Model {
            id,
            url: url.to_string(),
            product_id,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_skip_issues_single_query() {
        let row = product_row("Plain Tee", Uuid::new_v4());
        let id = row.id;
        let db: Arc<DatabaseConnection> = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection()
            .into();

        let product = ProductStore::new(Arc::clone(&db))
            .find_by_id(id, Relations::Skip)
            .await
            .unwrap()
            .unwrap();

        assert!(product.images.is_empty());
        assert!(product.user.is_none());
        assert_eq!(transaction_log(db).len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_id_eager_loads_images_and_owner() {
        let owner = Uuid::new_v4();
        let row = product_row("Eager Tee", owner);
        let id = row.id;
        let db: Arc<DatabaseConnection> = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .append_query_results([vec![
                image_row(1, "front.jpg", id),
                image_row(2, "back.jpg", id),
            ]])
            .append_query_results([vec![owner_row(owner)]])
            .into_connection()
            .into();

        let product = ProductStore::new(Arc::clone(&db))
            .find_by_id(id, Relations::Eager)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(product.image_urls(), vec!["front.jpg", "back.jpg"]);
        assert_eq!(product.user.map(|u| u.id), Some(owner));
        assert_eq!(transaction_log(db).len(), 3);
    }

    #[tokio::test]
    async fn test_find_by_term_miss() {
        let db: Arc<DatabaseConnection> = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection()
            .into();

        let found = ProductStore::new(db)
            .find_by_term("no such product", Relations::Eager)
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_all_groups_images_per_product() {
        let owner = Uuid::new_v4();
        let first = product_row("A Shirt", owner);
        let second = product_row("B Shirt", owner);
        let (first_id, second_id) = (first.id, second.id);
        let db: Arc<DatabaseConnection> = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![first, second]])
            .append_query_results([vec![
                image_row(1, "a1.jpg", first_id),
                image_row(2, "b1.jpg", second_id),
                image_row(3, "a2.jpg", first_id),
            ]])
            .append_query_results([vec![owner_row(owner)]])
            .into_connection()
            .into();

        let products = ProductStore::new(db)
            .find_all(10, 0, Relations::Eager)
            .await
            .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].image_urls(), vec!["a1.jpg", "a2.jpg"]);
        assert_eq!(products[1].image_urls(), vec!["b1.jpg"]);
        assert!(products.iter().all(|p| p.user.is_some()));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db: Arc<DatabaseConnection> = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection()
            .into();

        let err = ProductStore::new(db).delete(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
