//! Seed service tests over a SeaORM mock connection.

use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Transaction};
use std::sync::Arc;
use uuid::Uuid;

use shop_api::errors::AppError;
use shop_api::infra::entities::{product, product_image, user};
use shop_api::infra::Persistence;
use shop_api::services::seed_data::{PRODUCTS, USERS};
use shop_api::services::{SeedReport, SeedService, Seeder};

fn deleted(rows: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: rows,
    }
}

fn seeder(db: &Arc<DatabaseConnection>) -> Seeder<Persistence> {
    Seeder::new(Arc::new(Persistence::new(Arc::clone(db))))
}

/// Statements recorded by the mock; the seeder must be dropped first.
fn transaction_log(db: Arc<DatabaseConnection>) -> Vec<Transaction> {
    Arc::try_unwrap(db)
        .map_err(|_| "connection still shared")
        .unwrap()
        .into_transaction_log()
}

/// Queue one returned row per insert the seed issues
fn seeded_database() -> MockDatabase {
    let mut db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([deleted(12), deleted(2)]);

    let owner = Uuid::new_v4();
    for (i, seed) in USERS.iter().enumerate() {
        let id = if i == 0 { owner } else { Uuid::new_v4() };
        db = db.append_query_results([vec![user::Model {
            id,
            email: seed.email.to_string(),
            password: "hash".to_string(),
            full_name: seed.full_name.to_string(),
            is_active: true,
            roles: seed.roles.iter().map(|r| r.as_str().to_string()).collect(),
        }]]);
    }

    let mut image_id = 0;
    for seed in PRODUCTS {
        let (product, urls) = seed.to_create().into_product(Some(owner));
        db = db.append_query_results([vec![product::Model {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            description: product.description.clone(),
            slug: product.slug.clone(),
            stock: product.stock,
            sizes: product.sizes.clone(),
            gender: product.gender.as_str().to_string(),
            tags: product.tags.clone(),
            user_id: product.user_id,
        }]]);
        for url in urls {
            image_id += 1;
            db = db.append_query_results([vec![product_image::Model {
                id: image_id,
                url,
                product_id: product.id,
            }]]);
        }
    }

    db
}

#[tokio::test]
async fn test_seed_replaces_data_in_one_transaction() {
    let db = Arc::new(seeded_database().into_connection());

    let report = seeder(&db).run().await.unwrap();

    assert_eq!(
        report,
        SeedReport {
            users: 2,
            products: 12
        }
    );

    let log = transaction_log(db);
    assert_eq!(log.len(), 1);

    let log = format!("{:?}", log);
    let products_cleared = log.find("DELETE FROM \\\"products\\\"").unwrap();
    let users_cleared = log.find("DELETE FROM \\\"users\\\"").unwrap();
    assert!(products_cleared < users_cleared);
    assert!(log.contains("COMMIT"));
}

#[tokio::test]
async fn test_seed_failure_rolls_back() {
    // Clearing products fails: nothing queued on the mock
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let err = seeder(&db).run().await.unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
    let log = format!("{:?}", transaction_log(db));
    assert!(log.contains("ROLLBACK"));
    assert!(!log.contains("INSERT"));
}

#[test]
fn test_fixtures_are_consistent() {
    assert_eq!(USERS.len(), 2);
    assert_eq!(PRODUCTS.len(), 12);
    assert!(PRODUCTS.iter().all(|p| !p.images.is_empty()));

    let mut slugs: Vec<String> = PRODUCTS
        .iter()
        .map(|p| p.to_create().into_product(None).0.slug)
        .collect();
    slugs.sort();
    slugs.dedup();
    assert_eq!(slugs.len(), PRODUCTS.len());
}
