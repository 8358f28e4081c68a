use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use crosspromo_core::repository::{
    AffiliationRepository, CouponRepository, DealRepository, RepoError, RepoResult, StoreRepository,
};
use crosspromo_shared::{
    Affiliation, CouponDealView, CouponView, DealTemplate, IssuedCoupon, NewDealTemplate,
    NewIssuedCoupon, Store, StoreId,
};

#[derive(Debug, Default)]
struct Tables {
    stores: BTreeMap<StoreId, Store>,
    deals: BTreeMap<i64, DealTemplate>,
    last_deal_id: i64,
    affiliations: BTreeSet<Affiliation>,
    coupons: HashMap<Uuid, IssuedCoupon>,
}

/// In-memory implementation of every persistence port.
///
/// Intended for tests and local runs. All reads and writes go through one
/// lock, so the conditional update has the same compare-and-set behavior as
/// the SQL statement. Foreign keys the schema declares are checked too.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory rows normally arrive through bulk import; this is the seam
    /// for seeding them.
    pub fn insert_store(&self, store: Store) -> RepoResult<()> {
        let mut tables = self.write()?;
        tables.stores.insert(store.id.clone(), store);
        Ok(())
    }

    /// Make every subsequent call fail, simulating an unreachable database.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn affiliations(&self) -> RepoResult<Vec<Affiliation>> {
        Ok(self.read()?.affiliations.iter().cloned().collect())
    }

    pub fn coupon(&self, id: Uuid) -> RepoResult<Option<IssuedCoupon>> {
        Ok(self.read()?.coupons.get(&id).cloned())
    }

    pub fn coupon_count(&self) -> RepoResult<usize> {
        Ok(self.read()?.coupons.len())
    }

    fn check_available(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err("in-memory store marked unavailable".into());
        }
        Ok(())
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, Tables>> {
        self.check_available()?;
        self.tables.read().map_err(|_| RepoError::from("lock poisoned"))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, Tables>> {
        self.check_available()?;
        self.tables.write().map_err(|_| RepoError::from("lock poisoned"))
    }
}

#[async_trait]
impl StoreRepository for InMemoryStore {
    async fn list_stores(&self) -> RepoResult<Vec<Store>> {
        Ok(self.read()?.stores.values().cloned().collect())
    }

    async fn get_store(&self, id: &StoreId) -> RepoResult<Option<Store>> {
        Ok(self.read()?.stores.get(id).cloned())
    }

    async fn list_stores_by_ids(&self, ids: &[StoreId]) -> RepoResult<Vec<Store>> {
        let tables = self.read()?;
        let wanted: BTreeSet<&StoreId> = ids.iter().collect();
        Ok(wanted.into_iter().filter_map(|id| tables.stores.get(id).cloned()).collect())
    }
}

#[async_trait]
impl DealRepository for InMemoryStore {
    async fn list_deals_by_owners(&self, owner_ids: &[StoreId]) -> RepoResult<Vec<DealTemplate>> {
        let tables = self.read()?;
        Ok(tables
            .deals
            .values()
            .filter(|deal| owner_ids.contains(&deal.store_id))
            .cloned()
            .collect())
    }

    async fn insert_deal(&self, deal: &NewDealTemplate) -> RepoResult<DealTemplate> {
        let mut tables = self.write()?;
        if !tables.stores.contains_key(&deal.store_id) {
            return Err(format!("coupon_deals.store_id references missing store {}", deal.store_id).into());
        }

        tables.last_deal_id += 1;
        let template = DealTemplate {
            id: tables.last_deal_id,
            store_id: deal.store_id.clone(),
            description: deal.description.clone(),
            conditions: deal.conditions.clone(),
            created_at: Utc::now(),
        };
        tables.deals.insert(template.id, template.clone());
        Ok(template)
    }
}

#[async_trait]
impl AffiliationRepository for InMemoryStore {
    async fn upsert_affiliations(&self, pairs: &[Affiliation]) -> RepoResult<u64> {
        let mut tables = self.write()?;
        let mut inserted = 0;
        for pair in pairs {
            if tables.affiliations.insert(pair.clone()) {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn list_affiliations_involving(&self, id: &StoreId) -> RepoResult<Vec<Affiliation>> {
        let tables = self.read()?;
        Ok(tables.affiliations.iter().filter(|pair| pair.involves(id)).cloned().collect())
    }
}

#[async_trait]
impl CouponRepository for InMemoryStore {
    async fn insert_issued_coupon(&self, coupon: &NewIssuedCoupon) -> RepoResult<Uuid> {
        let mut tables = self.write()?;
        if !tables.deals.contains_key(&coupon.deal_id) {
            return Err(format!("issued_coupons.deal_id references missing deal {}", coupon.deal_id).into());
        }

        let issued = IssuedCoupon::new(coupon.clone(), Utc::now());
        let id = issued.id;
        tables.coupons.insert(id, issued);
        Ok(id)
    }

    async fn conditional_mark_used(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        require_unexpired: bool,
    ) -> RepoResult<u64> {
        let mut tables = self.write()?;
        let affected = match tables.coupons.get_mut(&id) {
            Some(coupon) => u64::from(coupon.try_mark_used(now, require_unexpired)),
            None => 0,
        };
        Ok(affected)
    }

    async fn get_issued_coupon_with_deal_and_store(&self, id: Uuid) -> RepoResult<Option<CouponView>> {
        let tables = self.read()?;
        let Some(coupon) = tables.coupons.get(&id) else {
            return Ok(None);
        };
        let Some(deal) = tables.deals.get(&coupon.deal_id) else {
            return Ok(None);
        };
        let Some(store) = tables.stores.get(&deal.store_id) else {
            return Ok(None);
        };

        Ok(Some(CouponView {
            id: coupon.id,
            status: coupon.status,
            expires_at: coupon.expires_at,
            used_at: coupon.used_at,
            origin_store_id: coupon.origin_store_id.clone(),
            deal: CouponDealView {
                id: deal.id,
                description: deal.description.clone(),
                conditions: deal.conditions.clone(),
                store_id: store.id.clone(),
                store_name: store.name.clone(),
                map_url: store.map_url.clone(),
            },
        }))
    }
}
