use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};
use crosspromo_catalog::{DealCatalog, StoreDirectory};
use crosspromo_core::repository::AffiliationRepository;
use crosspromo_core::{CoreResult, DependencyGuard};
use crosspromo_shared::{PartnerDeal, PartnerDeals, Store, StoreId};

pub const DEFAULT_PARTNER_DEAL_LIMIT: usize = 3;
pub const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// Picks a small random set of partner deals to show on a store's page
#[derive(Clone)]
pub struct PartnerDealSelector {
    directory: StoreDirectory,
    catalog: DealCatalog,
    affiliations: Arc<dyn AffiliationRepository>,
    guard: DependencyGuard,
    limit: usize,
    expiry_days: i64,
}

impl PartnerDealSelector {
    pub fn new(
        directory: StoreDirectory,
        catalog: DealCatalog,
        affiliations: Arc<dyn AffiliationRepository>,
        guard: DependencyGuard,
    ) -> Self {
        Self {
            directory,
            catalog,
            affiliations,
            guard,
            limit: DEFAULT_PARTNER_DEAL_LIMIT,
            expiry_days: DEFAULT_EXPIRY_DAYS,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_expiry_days(mut self, expiry_days: i64) -> Self {
        self.expiry_days = expiry_days;
        self
    }

    /// Up to `limit` partner deals, sampled uniformly without replacement.
    pub async fn select(&self, store_id: &StoreId) -> CoreResult<PartnerDeals> {
        let (origin, candidates) = self.candidates(store_id).await?;
        let deals = sample(&candidates, self.limit, &mut rand::thread_rng());
        Ok(self.finish(origin, candidates.len(), deals))
    }

    /// Same as [`select`](Self::select) with a caller-supplied random source.
    pub async fn select_with_rng<R>(&self, store_id: &StoreId, rng: &mut R) -> CoreResult<PartnerDeals>
    where
        R: Rng + Send + ?Sized,
    {
        let (origin, candidates) = self.candidates(store_id).await?;
        let deals = sample(&candidates, self.limit, rng);
        Ok(self.finish(origin, candidates.len(), deals))
    }

    fn finish(&self, origin: Store, candidate_count: usize, deals: Vec<PartnerDeal>) -> PartnerDeals {
        info!("Selected {} of {} partner deals for store {}", deals.len(), candidate_count, origin.id);
        PartnerDeals {
            origin_store_id: origin.id,
            store_name: origin.name,
            deals,
        }
    }

    /// Every deal the store may currently offer, annotated for display.
    async fn candidates(&self, store_id: &StoreId) -> CoreResult<(Store, Vec<PartnerDeal>)> {
        let origin = self.directory.get_store(store_id).await?;

        let pairs = self
            .guard
            .call("list affiliations", self.affiliations.list_affiliations_involving(store_id))
            .await?;
        if pairs.is_empty() {
            debug!("Store {} has no affiliations", store_id);
            return Ok((origin, Vec::new()));
        }

        let partner_ids: Vec<StoreId> = pairs
            .iter()
            .filter_map(|pair| pair.partner_of(store_id))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // The table only grows between regenerations, so a partner whose
        // category has since changed to match ours is dropped here.
        let partners: HashMap<StoreId, Store> = self
            .directory
            .get_stores(&partner_ids)
            .await?
            .into_iter()
            .filter(|partner| partner.id != origin.id && origin.is_cross_category(partner))
            .map(|partner| (partner.id.clone(), partner))
            .collect();
        if partners.is_empty() {
            return Ok((origin, Vec::new()));
        }

        let owner_ids: Vec<StoreId> = partners.keys().cloned().collect();
        let deals = self.catalog.list_by_owners(&owner_ids).await?;

        let candidates = deals
            .into_iter()
            .filter_map(|deal| {
                let partner = partners.get(&deal.store_id)?;
                Some(PartnerDeal::new(deal, partner.name.clone(), partner.map_url.clone(), self.expiry_days))
            })
            .collect();

        Ok((origin, candidates))
    }
}

fn sample<R>(candidates: &[PartnerDeal], limit: usize, rng: &mut R) -> Vec<PartnerDeal>
where
    R: Rng + ?Sized,
{
    candidates.choose_multiple(rng, limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspromo_core::CoreError;
    use crosspromo_store::InMemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::affiliation::AffiliationGraphBuilder;

    struct Fixture {
        mem: Arc<InMemoryStore>,
        selector: PartnerDealSelector,
        builder: AffiliationGraphBuilder,
        catalog: DealCatalog,
    }

    fn fixture() -> Fixture {
        let mem = Arc::new(InMemoryStore::new());
        let guard = DependencyGuard::default();
        let directory = StoreDirectory::new(mem.clone(), guard);
        let catalog = DealCatalog::new(mem.clone(), directory.clone(), guard);
        let selector = PartnerDealSelector::new(directory.clone(), catalog.clone(), mem.clone(), guard);
        let builder = AffiliationGraphBuilder::new(directory, mem.clone(), guard);
        Fixture { mem, selector, builder, catalog }
    }

    async fn seed_neighborhood(f: &Fixture) {
        f.mem.insert_store(Store::new("cafe-1", "Morning Cafe", Some("cafe"))).unwrap();
        f.mem.insert_store(Store::new("cafe-2", "Evening Cafe", Some("cafe"))).unwrap();
        f.mem.insert_store(Store::new("nail-1", "Nail Studio", Some("beauty")).with_map_url("https://map/nail-1")).unwrap();
        f.mem.insert_store(Store::new("bake-1", "Corner Bakery", Some("bakery"))).unwrap();

        for (owner, description) in [
            ("cafe-1", "Free refill"),
            ("cafe-2", "Free cookie"),
            ("nail-1", "10% off gel"),
            ("nail-1", "Free hand care"),
            ("bake-1", "Buy 2 get 1"),
            ("bake-1", "Free baguette"),
            ("bake-1", "20% off cakes"),
        ] {
            f.catalog.create_deal(&owner.into(), description, None).await.unwrap();
        }

        f.builder.regenerate().await.unwrap();
    }

    #[tokio::test]
    async fn test_never_more_than_limit_and_never_own_or_same_category() {
        let f = fixture();
        seed_neighborhood(&f).await;
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let result = f.selector.select_with_rng(&"cafe-1".into(), &mut rng).await.unwrap();
            assert_eq!(result.store_name, "Morning Cafe");
            assert!(result.deals.len() <= 3);
            for deal in &result.deals {
                assert_ne!(deal.store_id.as_str(), "cafe-1");
                assert_ne!(deal.store_id.as_str(), "cafe-2");
                assert_eq!(deal.expiry_days, 7);
            }
        }
    }

    #[tokio::test]
    async fn test_fewer_candidates_than_limit_returns_all() {
        let f = fixture();
        seed_neighborhood(&f).await;

        // bakery partners: cafe-1, cafe-2, nail-1 → 4 deals; limit 10 returns them all
        let selector = f.selector.clone().with_limit(10);
        let result = selector.select(&"bake-1".into()).await.unwrap();
        assert_eq!(result.deals.len(), 4);
    }

    #[tokio::test]
    async fn test_partner_metadata_attached() {
        let f = fixture();
        seed_neighborhood(&f).await;
        let selector = f.selector.clone().with_limit(10).with_expiry_days(14);

        let result = selector.select(&"bake-1".into()).await.unwrap();
        let nail_deal = result.deals.iter().find(|d| d.store_id.as_str() == "nail-1").unwrap();
        assert_eq!(nail_deal.store_name, "Nail Studio");
        assert_eq!(nail_deal.map_url.as_deref(), Some("https://map/nail-1"));
        assert_eq!(nail_deal.expiry_days, 14);
    }

    #[tokio::test]
    async fn test_sampling_reaches_every_candidate() {
        let f = fixture();
        seed_neighborhood(&f).await;
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = BTreeSet::new();

        for _ in 0..200 {
            let result = f.selector.select_with_rng(&"cafe-1".into(), &mut rng).await.unwrap();
            assert_eq!(result.deals.len(), 3);
            let ids: BTreeSet<i64> = result.deals.iter().map(|d| d.id).collect();
            assert_eq!(ids.len(), 3, "sampled without replacement");
            seen.extend(ids);
        }

        // cafe-1 partners: nail-1 (2 deals) and bake-1 (3 deals)
        assert_eq!(seen.len(), 5);
    }

    #[tokio::test]
    async fn test_store_without_affiliations_gets_empty_deals() {
        let f = fixture();
        f.mem.insert_store(Store::new("lonely", "Lonely Shop", Some("misc"))).unwrap();

        let result = f.selector.select(&"lonely".into()).await.unwrap();
        assert_eq!(result.store_name, "Lonely Shop");
        assert!(result.deals.is_empty());
    }

    #[tokio::test]
    async fn test_stale_same_category_partner_is_dropped() {
        let f = fixture();
        seed_neighborhood(&f).await;

        // nail-1 turns into a cafe after the graph was built
        f.mem.insert_store(Store::new("nail-1", "Nail Studio", Some("cafe"))).unwrap();

        let selector = f.selector.clone().with_limit(10);
        let result = selector.select(&"cafe-1".into()).await.unwrap();
        assert!(result.deals.iter().all(|d| d.store_id.as_str() == "bake-1"));
        assert_eq!(result.deals.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_store_is_not_found() {
        let f = fixture();
        let result = f.selector.select(&"ghost".into()).await;
        assert!(matches!(result, Err(CoreError::NotFoundError(_))));
    }

    #[tokio::test]
    async fn test_backend_failure_is_surfaced() {
        let f = fixture();
        seed_neighborhood(&f).await;
        f.mem.set_unavailable(true);

        let result = f.selector.select(&"cafe-1".into()).await;
        assert!(matches!(result, Err(CoreError::DependencyError(_))));
    }
}
