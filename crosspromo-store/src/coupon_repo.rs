use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use crosspromo_core::repository::{CouponRepository, RepoError, RepoResult};
use crosspromo_shared::{CouponDealView, CouponStatus, CouponView, NewIssuedCoupon, StoreId};

pub struct PgCouponRepository {
    pool: PgPool,
}

impl PgCouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CouponViewRow {
    id: Uuid,
    status: String,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
    origin_store_id: String,
    deal_id: i64,
    description: String,
    conditions: Option<String>,
    store_id: String,
    store_name: String,
    map_url: Option<String>,
}

impl TryFrom<CouponViewRow> for CouponView {
    type Error = RepoError;

    fn try_from(row: CouponViewRow) -> Result<Self, Self::Error> {
        let status: CouponStatus = row.status.parse()?;

        Ok(CouponView {
            id: row.id,
            status,
            expires_at: row.expires_at,
            used_at: row.used_at,
            origin_store_id: StoreId::new(row.origin_store_id),
            deal: CouponDealView {
                id: row.deal_id,
                description: row.description,
                conditions: row.conditions,
                store_id: StoreId::new(row.store_id),
                store_name: row.store_name,
                map_url: row.map_url,
            },
        })
    }
}

#[async_trait]
impl CouponRepository for PgCouponRepository {
    async fn insert_issued_coupon(&self, coupon: &NewIssuedCoupon) -> RepoResult<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO issued_coupons (deal_id, origin_store_id, status, expires_at)
            VALUES ($1, $2, 'unused', $3)
            RETURNING id
            "#,
        )
        .bind(coupon.deal_id)
        .bind(coupon.origin_store_id.as_str())
        .bind(coupon.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn conditional_mark_used(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        require_unexpired: bool,
    ) -> RepoResult<u64> {
        // Single statement compare-and-set; the status predicate is what keeps
        // two concurrent redemptions from both matching the row.
        let result = sqlx::query(
            r#"
            UPDATE issued_coupons
            SET status = 'used', used_at = $2
            WHERE id = $1
              AND status = 'unused'
              AND (NOT $3 OR expires_at > $2)
            "#,
        )
        .bind(id)
        .bind(now)
        .bind(require_unexpired)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn get_issued_coupon_with_deal_and_store(&self, id: Uuid) -> RepoResult<Option<CouponView>> {
        let row: Option<CouponViewRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.status, c.expires_at, c.used_at, c.origin_store_id,
                   d.id AS deal_id, d.description, d.conditions, d.store_id,
                   s.store_name, s.map_url
            FROM issued_coupons c
            JOIN coupon_deals d ON d.id = c.deal_id
            JOIN stores s ON s.id = d.store_id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CouponView::try_from).transpose()
    }
}
