//! Product service tests.
//!
//! Reads go through a hand-written repository that records the relation
//! policy it is asked for; writes run in a real [`Persistence`] transaction
//! over a SeaORM mock connection.

use async_trait::async_trait;
use parking_lot::Mutex;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use std::sync::Arc;
use uuid::Uuid;

use shop_api::domain::{CreateProduct, Gender, Product, ProductImage, UpdateProduct};
use shop_api::errors::{AppError, AppResult};
use shop_api::infra::entities::{product, product_image};
use shop_api::infra::{
    Persistence, ProductRepository, Relations, TransactionContext, TxFuture, UnitOfWork,
    UserRepository,
};
use shop_api::services::{ProductCatalog, ProductService};
use shop_api::{User, UserRole};

// =============================================================================
// Test Doubles
// =============================================================================

#[derive(Default)]
struct FakeProductRepository {
    stored: Mutex<Option<Product>>,
    reads: Mutex<Vec<Relations>>,
    deleted: Mutex<Vec<Uuid>>,
}

impl FakeProductRepository {
    fn holding(product: Product) -> Self {
        Self {
            stored: Mutex::new(Some(product)),
            ..Default::default()
        }
    }

    fn reads(&self) -> Vec<Relations> {
        self.reads.lock().clone()
    }

    fn matching(&self, accept: impl Fn(&Product) -> bool) -> Option<Product> {
        self.stored.lock().clone().filter(|p| accept(p))
    }
}

#[async_trait]
impl ProductRepository for FakeProductRepository {
    async fn find_all(
        &self,
        _limit: u64,
        _offset: u64,
        relations: Relations,
    ) -> AppResult<Vec<Product>> {
        self.reads.lock().push(relations);
        Ok(self.stored.lock().clone().into_iter().collect())
    }

    async fn find_by_id(&self, id: Uuid, relations: Relations) -> AppResult<Option<Product>> {
        self.reads.lock().push(relations);
        Ok(self.matching(|p| p.id == id))
    }

    async fn find_by_term(&self, term: &str, relations: Relations) -> AppResult<Option<Product>> {
        self.reads.lock().push(relations);
        Ok(self.matching(|p| p.slug == term || p.title.to_uppercase() == term.to_uppercase()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.deleted.lock().push(id);
        Ok(())
    }
}

/// Fake reads, real transactions
struct TestUnitOfWork {
    persistence: Persistence,
    products: Arc<FakeProductRepository>,
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.persistence.users()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.persistence.transaction(f).await
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn editor() -> User {
    User {
        id: Uuid::new_v4(),
        email: "admin@example.com".to_string(),
        password_hash: "hash".to_string(),
        full_name: "Admin".to_string(),
        is_active: true,
        roles: vec![UserRole::Admin],
    }
}

fn tee() -> Product {
    Product {
        id: Uuid::new_v4(),
        title: "Plain Tee".to_string(),
        price: 20.0,
        description: None,
        slug: "plain_tee".to_string(),
        stock: 4,
        sizes: vec!["M".to_string()],
        gender: Gender::Unisex,
        tags: vec![],
        user_id: None,
        images: vec![ProductImage {
            id: 1,
            url: "old.jpg".to_string(),
        }],
        user: None,
    }
}

fn row(product: &Product) -> product::Model {
    product::Model {
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
    }
}

fn image_row(id: i32, url: &str, product_id: Uuid) -> product_image::Model {
    product_image::Model {
        id,
        url: url.to_string(),
        product_id,
    }
}

fn catalog(
    db: &Arc<DatabaseConnection>,
    products: Arc<FakeProductRepository>,
) -> ProductCatalog<TestUnitOfWork> {
    let uow = TestUnitOfWork {
        persistence: Persistence::new(Arc::clone(db)),
        products,
    };
    ProductCatalog::new(Arc::new(uow))
}

fn connect(mock: MockDatabase) -> Arc<DatabaseConnection> {
    Arc::new(mock.into_connection())
}

fn idle_db() -> Arc<DatabaseConnection> {
    connect(MockDatabase::new(DatabaseBackend::Postgres))
}

/// Statements recorded by the mock; every service handle must be dropped first.
fn transaction_log(db: Arc<DatabaseConnection>) -> String {
    let db = Arc::try_unwrap(db)
        .map_err(|_| "connection still shared")
        .unwrap();
    format!("{:?}", db.into_transaction_log())
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_find_one_by_uuid_loads_relations() {
    let product = tee();
    let id = product.id;
    let repo = Arc::new(FakeProductRepository::holding(product));

    let found = catalog(&idle_db(), repo.clone())
        .find_one(&id.to_string())
        .await
        .unwrap();

    assert_eq!(found.id, id);
    assert_eq!(repo.reads(), vec![Relations::Eager]);
}

#[tokio::test]
async fn test_find_one_by_title_is_case_insensitive() {
    let repo = Arc::new(FakeProductRepository::holding(tee()));

    let found = catalog(&idle_db(), repo.clone())
        .find_one("PLAIN TEE")
        .await
        .unwrap();

    assert_eq!(found.slug, "plain_tee");
    assert_eq!(repo.reads(), vec![Relations::Eager]);
}

#[tokio::test]
async fn test_find_one_miss_names_the_term() {
    let repo = Arc::new(FakeProductRepository::default());

    let err = catalog(&idle_db(), repo)
        .find_one("nothing")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref m) if m == "Product with nothing not found"));
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_create_inserts_product_and_images_in_order() {
    let owner = editor();
    let input = CreateProduct {
        title: "Kids Hoodie".to_string(),
        price: Some(35.0),
        description: None,
        slug: None,
        stock: Some(3),
        sizes: vec!["XS".to_string()],
        gender: Gender::Kid,
        tags: None,
        images: Some(vec!["a.jpg".to_string(), "b.jpg".to_string()]),
    };
    let (expected, _) = input.clone().into_product(Some(owner.id));

    // Product id is generated inside the service; the mock returns rows as given
    let db = connect(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(&expected)]])
            .append_query_results([vec![image_row(1, "a.jpg", expected.id)]])
            .append_query_results([vec![image_row(2, "b.jpg", expected.id)]]),
    );

    let created = catalog(&db, Arc::new(FakeProductRepository::default()))
        .create(input, owner.clone())
        .await
        .unwrap();

    assert_eq!(created.slug, "kids_hoodie");
    assert_eq!(created.user_id, Some(owner.id));
    assert_eq!(created.image_urls(), vec!["a.jpg", "b.jpg"]);
    assert_eq!(created.user.map(|u| u.id), Some(owner.id));
}

#[tokio::test]
async fn test_update_missing_product_touches_nothing() {
    let db = idle_db();
    let id = Uuid::new_v4();

    let err = catalog(&db, Arc::new(FakeProductRepository::default()))
        .update(id, UpdateProduct::default(), editor())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref m) if *m == format!("Product with id {} not found", id)));
    assert_eq!(transaction_log(db), "[]");
}

#[tokio::test]
async fn test_update_without_images_keeps_them() {
    let product = tee();
    let id = product.id;
    let repo = Arc::new(FakeProductRepository::holding(product.clone()));

    // Only the UPDATE ... RETURNING row is queued: touching images would fail
    let db = connect(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(&product)]]),
    );

    let changes = UpdateProduct {
        stock: Some(9),
        ..Default::default()
    };
    let updated = catalog(&db, repo.clone())
        .update(id, changes, editor())
        .await
        .unwrap();

    assert_eq!(updated.id, id);
    assert_eq!(repo.reads(), vec![Relations::Skip, Relations::Eager]);
}

#[tokio::test]
async fn test_update_writes_merged_fields_and_editor() {
    let product = tee();
    let id = product.id;
    let repo = Arc::new(FakeProductRepository::holding(product.clone()));
    let editor = editor();

    let db = connect(
        MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![row(&product)]]),
    );

    let changes = UpdateProduct {
        title: Some("New Name".to_string()),
        stock: Some(9),
        ..Default::default()
    };
    catalog(&db, repo)
        .update(id, changes, editor.clone())
        .await
        .unwrap();

    let log = transaction_log(db);
    assert!(log.contains("UPDATE \\\"products\\\""));
    assert!(log.contains("\"New Name\""));
    assert!(log.contains("\"new_name\""));
    assert!(log.contains(&editor.id.to_string()));
    assert!(log.contains("COMMIT"));
}

#[tokio::test]
async fn test_update_replaces_images() {
    let product = tee();
    let id = product.id;
    let repo = Arc::new(FakeProductRepository::holding(product.clone()));

    let db = connect(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![image_row(2, "new-1.jpg", id)]])
            .append_query_results([vec![image_row(3, "new-2.jpg", id)]])
            .append_query_results([vec![row(&product)]]),
    );

    let changes = UpdateProduct {
        images: Some(vec!["new-1.jpg".to_string(), "new-2.jpg".to_string()]),
        ..Default::default()
    };
    catalog(&db, repo.clone())
        .update(id, changes, editor())
        .await
        .unwrap();

    assert_eq!(repo.reads(), vec![Relations::Skip, Relations::Eager]);

    let log = transaction_log(db);
    assert!(log.contains("DELETE FROM \\\"product_images\\\""));
    assert!(log.contains("COMMIT"));
}

#[tokio::test]
async fn test_update_rolls_back_when_a_write_fails() {
    let product = tee();
    let id = product.id;
    let repo = Arc::new(FakeProductRepository::holding(product));

    // No exec result queued, so deleting the old images errors
    let db = idle_db();

    let changes = UpdateProduct {
        images: Some(vec!["new.jpg".to_string()]),
        ..Default::default()
    };
    let err = catalog(&db, repo.clone())
        .update(id, changes, editor())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
    assert_eq!(repo.reads(), vec![Relations::Skip]);

    let log = transaction_log(db);
    assert!(log.contains("ROLLBACK"));
    assert!(!log.contains("COMMIT"));
}

#[tokio::test]
async fn test_remove_checks_existence_first() {
    let product = tee();
    let id = product.id;
    let repo = Arc::new(FakeProductRepository::holding(product));
    let service = catalog(&idle_db(), repo.clone());

    service.remove(id).await.unwrap();
    assert_eq!(*repo.deleted.lock(), vec![id]);

    let missing = Uuid::new_v4();
    let err = service.remove(missing).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(repo.deleted.lock().len(), 1);
}
