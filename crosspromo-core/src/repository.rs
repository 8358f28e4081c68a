use async_trait::async_trait;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use crosspromo_shared::{
    Affiliation, CouponView, DealTemplate, NewDealTemplate, NewIssuedCoupon, Store, StoreId,
};

/// Error type returned by persistence adapters
pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository trait for the store directory
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn list_stores(&self) -> RepoResult<Vec<Store>>;

    async fn get_store(&self, id: &StoreId) -> RepoResult<Option<Store>>;

    /// Unknown ids are skipped.
    async fn list_stores_by_ids(&self, ids: &[StoreId]) -> RepoResult<Vec<Store>>;
}

/// Repository trait for deal templates
#[async_trait]
pub trait DealRepository: Send + Sync {
    async fn list_deals_by_owners(&self, owner_ids: &[StoreId]) -> RepoResult<Vec<DealTemplate>>;

    async fn insert_deal(&self, deal: &NewDealTemplate) -> RepoResult<DealTemplate>;
}

/// Repository trait for derived affiliation pairs
#[async_trait]
pub trait AffiliationRepository: Send + Sync {
    /// Insert pairs, ignoring any `(store_a, store_b)` already present.
    /// Returns the number of rows actually inserted.
    async fn upsert_affiliations(&self, pairs: &[Affiliation]) -> RepoResult<u64>;

    async fn list_affiliations_involving(&self, id: &StoreId) -> RepoResult<Vec<Affiliation>>;
}

/// Repository trait for issued coupons
#[async_trait]
pub trait CouponRepository: Send + Sync {
    async fn insert_issued_coupon(&self, coupon: &NewIssuedCoupon) -> RepoResult<Uuid>;

    /// Atomically set `status = used, used_at = now` where the coupon is
    /// still unused (and, if `require_unexpired`, `expires_at > now`).
    /// Returns the affected row count; never reads then writes.
    async fn conditional_mark_used(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        require_unexpired: bool,
    ) -> RepoResult<u64>;

    async fn get_issued_coupon_with_deal_and_store(&self, id: Uuid) -> RepoResult<Option<CouponView>>;
}
