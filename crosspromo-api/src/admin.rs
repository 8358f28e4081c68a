use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use crosspromo_offer::RegenerationReport;
use crosspromo_shared::{DealTemplate, StoreId};
use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateDealRequest {
    pub description: String,
    pub conditions: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/affiliations/regenerate", post(regenerate_affiliations))
        .route("/stores/{store_id}/deals", post(create_deal))
}

async fn regenerate_affiliations(
    State(state): State<AppState>,
) -> Result<Json<RegenerationReport>, AppError> {
    Ok(Json(state.graph.regenerate().await?))
}

async fn create_deal(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(req): Json<CreateDealRequest>,
) -> Result<(StatusCode, Json<DealTemplate>), AppError> {
    let deal = state
        .catalog
        .create_deal(&StoreId::new(store_id), &req.description, req.conditions.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(deal)))
}
