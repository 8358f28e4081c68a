use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use crosspromo_core::repository::{AffiliationRepository, RepoResult};
use crosspromo_shared::{Affiliation, StoreId};

/// Rows per INSERT statement; two bind parameters per row keeps this far
/// below the Postgres parameter limit.
const UPSERT_CHUNK_SIZE: usize = 1000;

pub struct PgAffiliationRepository {
    pool: PgPool,
}

impl PgAffiliationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AffiliationRepository for PgAffiliationRepository {
    async fn upsert_affiliations(&self, pairs: &[Affiliation]) -> RepoResult<u64> {
        let mut inserted = 0;

        // Chunks are not wrapped in one transaction: a failure leaves earlier
        // chunks applied, and the conflict clause makes the retry harmless.
        for chunk in pairs.chunks(UPSERT_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO affiliations (store_a_id, store_b_id) ");
            builder.push_values(chunk, |mut row, pair| {
                row.push_bind(pair.store_a.as_str().to_owned())
                    .push_bind(pair.store_b.as_str().to_owned());
            });
            builder.push(" ON CONFLICT (store_a_id, store_b_id) DO NOTHING");

            let result = builder.build().execute(&self.pool).await?;
            debug!("Affiliation chunk of {} rows, {} new", chunk.len(), result.rows_affected());
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    async fn list_affiliations_involving(&self, id: &StoreId) -> RepoResult<Vec<Affiliation>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT store_a_id, store_b_id FROM affiliations WHERE store_a_id = $1 OR store_b_id = $1",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(a, b)| Affiliation { store_a: StoreId::new(a), store_b: StoreId::new(b) })
            .collect())
    }
}
