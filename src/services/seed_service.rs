//! Seed service - Resets the database to the fixture data set.

use async_trait::async_trait;
use std::sync::Arc;

use super::seed_data::{PRODUCTS, USERS};
use crate::domain::{NewUser, Password};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Row counts written by a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
}

#[async_trait]
pub trait SeedService: Send + Sync {
    /// Wipe products and users, then insert the fixtures in one transaction.
    async fn run(&self) -> AppResult<SeedReport>;
}

pub struct Seeder<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Seeder<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SeedService for Seeder<U> {
    async fn run(&self) -> AppResult<SeedReport> {
        // Hash outside the transaction; Argon2 is slow on purpose
        let new_users = USERS
            .iter()
            .map(|seed| {
                let hash = Password::new(seed.password)?.into_string();
                Ok(NewUser::new(seed.email, hash, seed.full_name.to_string())
                    .with_roles(seed.roles.to_vec()))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let report = crate::with_transaction!(self.uow, |ctx| {
            let products_removed = ctx.products().delete_all().await?;
            let users_removed = ctx.users().delete_all().await?;
            tracing::debug!(products_removed, users_removed, "Cleared existing data");

            let mut owner = None;
            for new_user in new_users {
                let user = ctx.users().insert(new_user).await?;
                owner.get_or_insert(user.id);
            }
            let owner = owner.ok_or_else(|| AppError::internal("Seed data has no users"))?;

            for seed in PRODUCTS {
                let (product, urls) = seed.to_create().into_product(Some(owner));
                ctx.products().insert(&product).await?;
                ctx.products().insert_images(product.id, &urls).await?;
            }

            Ok(SeedReport {
                users: USERS.len(),
                products: PRODUCTS.len(),
            })
        })?;

        tracing::info!(users = report.users, products = report.products, "Seed executed");
        Ok(report)
    }
}
