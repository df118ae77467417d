//! Product catalog handlers. Every route requires a bearer token.

use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{get, patch, post},
    Extension, Router,
};

use crate::api::extractors::{UuidParam, ValidatedJson, ValidatedQuery};
use crate::api::middleware::{auth_middleware, role_guard, CurrentUser};
use crate::api::AppState;
use crate::domain::{CreateProduct, ProductResponse, UpdateProduct, UserRole};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, PaginationParams};

const EDITOR_ROLES: &[UserRole] = &[UserRole::Admin];

/// Create product routes
///
/// Writes on an existing product sit behind the role guard, which the outer
/// auth layer wraps.
pub fn product_routes(state: AppState) -> Router<AppState> {
    let editor_routes = Router::new()
        .route("/:term", patch(update_product).delete(delete_product))
        .route_layer(middleware::from_fn_with_state(EDITOR_ROLES, role_guard));

    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:term", get(get_product))
        .merge(editor_routes)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Create a product owned by the caller
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation error or duplicate title/slug"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateProduct>,
) -> AppResult<Created<ProductResponse>> {
    let product = state.product_service.create(payload, user).await?;
    Ok(Created(ProductResponse::from(product)))
}

/// List products with images and owner
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of products", body = [ProductResponse]),
        (status = 400, description = "Invalid limit or offset"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    ValidatedQuery(pagination): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state.product_service.find_all(pagination).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Find one product by id, title or slug
#[utoipa::path(
    get,
    path = "/api/products/{term}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("term" = String, Path, description = "Product UUID, title or slug")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.product_service.find_one(&term).await?;
    Ok(Json(ProductResponse::from(product)))
}

/// Update a product (admin only)
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = uuid::Uuid, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid id, validation error or duplicate title/slug"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    UuidParam(id): UuidParam,
    ValidatedJson(payload): ValidatedJson<UpdateProduct>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.product_service.update(id, payload, user).await?;
    Ok(Json(ProductResponse::from(product)))
}

/// Delete a product and its images (admin only)
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = uuid::Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Invalid id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    UuidParam(id): UuidParam,
) -> AppResult<NoContent> {
    state.product_service.remove(id).await?;
    Ok(NoContent)
}
