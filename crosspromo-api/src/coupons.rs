use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    routing::get,
    Form, Json, Router,
};
use serde::Serialize;
use uuid::Uuid;
use crosspromo_core::CoreError;
use crosspromo_coupon::IssueCouponRequest;
use crosspromo_shared::CouponView;
use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    pub success: bool,
    pub issued_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Returned when redemption could not be attempted, e.g. the database is down.
pub const REDEMPTION_UNAVAILABLE_MESSAGE: &str = "Coupon could not be verified right now, please try again";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/generate", get(generate_via_get).post(issue_coupon))
        .route("/coupon/{coupon_id}", get(view_coupon).post(redeem_coupon))
}

async fn issue_coupon(
    State(state): State<AppState>,
    form: Result<Form<IssueCouponRequest>, FormRejection>,
) -> Result<Json<IssueResponse>, AppError> {
    let Form(req) = form.map_err(|e| AppError::ValidationError(e.body_text()))?;

    let issued_id = state.coupons.issue(&req).await?;

    Ok(Json(IssueResponse {
        success: true,
        issued_id,
        message: "Coupon issued".to_string(),
    }))
}

async fn generate_via_get() -> AppError {
    AppError::ValidationError("Coupons are issued by submitting the form with POST".to_string())
}

async fn view_coupon(
    State(state): State<AppState>,
    Path(coupon_id): Path<String>,
) -> Result<Json<CouponView>, AppError> {
    Ok(Json(state.coupons.view(&coupon_id).await?))
}

async fn redeem_coupon(
    State(state): State<AppState>,
    Path(coupon_id): Path<String>,
) -> (StatusCode, Json<RedeemResponse>) {
    let (status, message) = match state.coupons.redeem(&coupon_id).await {
        Ok(_) => return (StatusCode::OK, Json(RedeemResponse { success: true, message: None })),
        Err(CoreError::ConflictError(message)) => (StatusCode::CONFLICT, message),
        Err(e) => {
            tracing::error!("Redemption of coupon {} failed: {}", coupon_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, REDEMPTION_UNAVAILABLE_MESSAGE.to_string())
        }
    };

    (status, Json(RedeemResponse { success: false, message: Some(message) }))
}
