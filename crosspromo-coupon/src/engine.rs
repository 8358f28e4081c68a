use std::sync::Arc;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use crosspromo_core::repository::CouponRepository;
use crosspromo_core::{CoreError, CoreResult, DependencyGuard};
use crosspromo_shared::CouponView;
use crate::issue::IssueCouponRequest;

/// Returned for every rejected redemption, whatever the cause.
pub const REDEMPTION_FAILED_MESSAGE: &str = "Coupon verification failed: invalid or already used";

/// Issues single-use coupons and redeems them at most once.
///
/// Holds no locks: the `unused → used` transition is a conditional update in
/// the persistence layer, so concurrent redemptions of one coupon cannot both
/// succeed.
#[derive(Clone)]
pub struct CouponEngine {
    repo: Arc<dyn CouponRepository>,
    guard: DependencyGuard,
    enforce_expiry: bool,
}

impl CouponEngine {
    pub fn new(repo: Arc<dyn CouponRepository>, guard: DependencyGuard) -> Self {
        Self { repo, guard, enforce_expiry: false }
    }

    /// Reject redemption once `expires_at` has passed.
    pub fn with_expiry_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_expiry = enforce;
        self
    }

    /// Create one new unused coupon. Not idempotent: each call inserts a row.
    pub async fn issue(&self, req: &IssueCouponRequest) -> CoreResult<Uuid> {
        let coupon = req.validate(Utc::now())?;

        let id = self
            .guard
            .call("insert issued coupon", self.repo.insert_issued_coupon(&coupon))
            .await?;

        info!(
            "Issued coupon {} for deal {} from store {}, expires {}",
            id, coupon.deal_id, coupon.origin_store_id, coupon.expires_at
        );
        Ok(id)
    }

    /// Transition `unused → used`. Returns the redemption timestamp.
    pub async fn redeem(&self, coupon_id: &str) -> CoreResult<DateTime<Utc>> {
        let Ok(id) = Uuid::parse_str(coupon_id.trim()) else {
            warn!("Redemption rejected for malformed coupon id {:?}", coupon_id);
            return Err(CoreError::conflict(REDEMPTION_FAILED_MESSAGE));
        };

        let now = Utc::now();
        let affected = self
            .guard
            .call("mark coupon used", self.repo.conditional_mark_used(id, now, self.enforce_expiry))
            .await?;

        if affected == 0 {
            warn!("Redemption rejected for coupon {}", id);
            return Err(CoreError::conflict(REDEMPTION_FAILED_MESSAGE));
        }

        info!("Coupon {} redeemed at {}", id, now);
        Ok(now)
    }

    pub async fn view(&self, coupon_id: &str) -> CoreResult<CouponView> {
        let not_found = || CoreError::not_found(format!("coupon {}", coupon_id));

        let id = Uuid::parse_str(coupon_id.trim()).map_err(|_| not_found())?;
        self.guard
            .call("get coupon", self.repo.get_issued_coupon_with_deal_and_store(id))
            .await?
            .ok_or_else(not_found)
    }
}
