use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use crosspromo_shared::{PartnerDeals, StoreId};
use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/shop/{store_id}", get(shop_page))
}

/// Store page: the store's name plus a random handful of partner deals.
async fn shop_page(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<PartnerDeals>, AppError> {
    let deals = state.selector.select(&StoreId::new(store_id)).await?;
    Ok(Json(deals))
}
