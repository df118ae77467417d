//! Unit of Work pattern implementation.
//!
//! Coordinates operations across the user and product aggregates atomically:
//! - Centralizes access to all repositories
//! - Manages database transactions (begin, commit, rollback)
//! - Keeps multi-statement writes such as image replacement all-or-nothing

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IsolationLevel, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{product, product_image, user};
use super::repositories::{
    new_user_model, product_model, ProductRepository, ProductStore, UserRepository, UserStore,
};
use crate::domain::{NewUser, Product, ProductImage, User};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by a transaction body.
pub type TxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// Tests wrap [`Persistence`] over a mock connection instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get product repository
    fn products(&self) -> Arc<dyn ProductRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed when the closure returns `Ok` and rolled
    /// back otherwise; the closure's error is returned unchanged.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    /// Get product repository for this transaction
    pub fn products(&self) -> TxProductRepository<'_> {
        TxProductRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: Arc<DatabaseConnection>,
    user_repo: Arc<UserStore>,
    product_repo: Arc<ProductStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let user_repo = Arc::new(UserStore::new(Arc::clone(&db)));
        let product_repo = Arc::new(ProductStore::new(Arc::clone(&db)));
        Self {
            db,
            user_repo,
            product_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    /// Insert a user inside the transaction
    pub async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let model = new_user_model(new_user)
            .insert(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(User::from(model))
    }

    /// Delete every user. Returns the number of rows removed.
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = user::Entity::delete_many()
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}

/// Transaction-aware product repository.
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    /// Insert the product row (images are separate)
    pub async fn insert(&self, product: &Product) -> AppResult<()> {
        product_model(product)
            .insert(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    /// Insert image rows one by one so ids follow `urls` order.
    pub async fn insert_images(
        &self,
        product_id: Uuid,
        urls: &[String],
    ) -> AppResult<Vec<ProductImage>> {
        let mut images = Vec::with_capacity(urls.len());

        for url in urls {
            let model = product_image::ActiveModel {
                id: ActiveValue::NotSet,
                url: Set(url.clone()),
                product_id: Set(product_id),
            }
            .insert(self.txn)
            .await
            .map_err(AppError::from)?;

            images.push(ProductImage::from(model));
        }

        Ok(images)
    }

    /// Drop every image of one product
    pub async fn delete_images(&self, product_id: Uuid) -> AppResult<u64> {
        let result = product_image::Entity::delete_many()
            .filter(product_image::Column::ProductId.eq(product_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    /// Overwrite every column of an existing product
    pub async fn update(&self, product: &Product) -> AppResult<()> {
        let mut active = product_model(product);
        active.id = ActiveValue::Unchanged(product.id);

        active.update(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }

    /// Delete every product; images cascade.
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = product::Entity::delete_many()
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
