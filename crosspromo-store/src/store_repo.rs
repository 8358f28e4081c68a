use async_trait::async_trait;
use sqlx::PgPool;
use crosspromo_core::repository::{RepoResult, StoreRepository};
use crosspromo_shared::{Masked, Store, StoreId};

pub struct PgStoreRepository {
    pool: PgPool,
}

impl PgStoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct StoreRow {
    id: String,
    store_name: String,
    category: Option<String>,
    map_url: Option<String>,
    address: Option<String>,
    contact: Option<String>,
    region: Option<String>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Store {
            id: StoreId::new(row.id),
            name: row.store_name,
            category: row.category,
            map_url: row.map_url,
            address: row.address,
            contact: row.contact.map(Masked),
            region: row.region,
        }
    }
}

const STORE_COLUMNS: &str = "id, store_name, category, map_url, address, contact, region";

#[async_trait]
impl StoreRepository for PgStoreRepository {
    async fn list_stores(&self) -> RepoResult<Vec<Store>> {
        let rows: Vec<StoreRow> = sqlx::query_as(&format!("SELECT {} FROM stores ORDER BY id", STORE_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Store::from).collect())
    }

    async fn get_store(&self, id: &StoreId) -> RepoResult<Option<Store>> {
        let row: Option<StoreRow> = sqlx::query_as(&format!("SELECT {} FROM stores WHERE id = $1", STORE_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Store::from))
    }

    async fn list_stores_by_ids(&self, ids: &[StoreId]) -> RepoResult<Vec<Store>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
        let rows: Vec<StoreRow> = sqlx::query_as(&format!("SELECT {} FROM stores WHERE id = ANY($1) ORDER BY id", STORE_COLUMNS))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Store::from).collect())
    }
}
