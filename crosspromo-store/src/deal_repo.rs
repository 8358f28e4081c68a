use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, Utc};
use crosspromo_core::repository::{DealRepository, RepoResult};
use crosspromo_shared::{DealTemplate, NewDealTemplate, StoreId};

pub struct PgDealRepository {
    pool: PgPool,
}

impl PgDealRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DealRow {
    id: i64,
    store_id: String,
    description: String,
    conditions: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DealRow> for DealTemplate {
    fn from(row: DealRow) -> Self {
        DealTemplate {
            id: row.id,
            store_id: StoreId::new(row.store_id),
            description: row.description,
            conditions: row.conditions,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl DealRepository for PgDealRepository {
    async fn list_deals_by_owners(&self, owner_ids: &[StoreId]) -> RepoResult<Vec<DealTemplate>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }

        let owners: Vec<String> = owner_ids.iter().map(|id| id.as_str().to_string()).collect();
        let rows: Vec<DealRow> = sqlx::query_as(
            r#"
            SELECT id, store_id, description, conditions, created_at
            FROM coupon_deals
            WHERE store_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(owners)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DealTemplate::from).collect())
    }

    async fn insert_deal(&self, deal: &NewDealTemplate) -> RepoResult<DealTemplate> {
        let row: DealRow = sqlx::query_as(
            r#"
            INSERT INTO coupon_deals (store_id, description, conditions)
            VALUES ($1, $2, $3)
            RETURNING id, store_id, description, conditions, created_at
            "#,
        )
        .bind(deal.store_id.as_str())
        .bind(&deal.description)
        .bind(deal.conditions.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
