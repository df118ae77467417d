//! Seed handler.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::MessageResponse;

pub fn seed_routes() -> Router<AppState> {
    Router::new().route("/", get(execute_seed))
}

/// Reset users and products to the fixture data
#[utoipa::path(
    get,
    path = "/api/seed",
    tag = "Seed",
    responses(
        (status = 200, description = "Seed executed", body = MessageResponse)
    )
)]
pub async fn execute_seed(State(state): State<AppState>) -> AppResult<Json<MessageResponse>> {
    state.seed_service.run().await?;
    Ok(Json(MessageResponse::new("SEED EXECUTED")))
}
