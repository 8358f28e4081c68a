use std::sync::Arc;
use crosspromo_catalog::{DealCatalog, StoreDirectory};
use crosspromo_core::repository::{AffiliationRepository, CouponRepository, DealRepository, StoreRepository};
use crosspromo_core::DependencyGuard;
use crosspromo_coupon::CouponEngine;
use crosspromo_offer::{AffiliationGraphBuilder, PartnerDealSelector};
use crosspromo_store::app_config::BusinessRules;

/// Services shared by all handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub catalog: DealCatalog,
    pub graph: AffiliationGraphBuilder,
    pub selector: PartnerDealSelector,
    pub coupons: CouponEngine,
}

/// The four persistence ports the services are built on
pub struct Repositories {
    pub stores: Arc<dyn StoreRepository>,
    pub deals: Arc<dyn DealRepository>,
    pub affiliations: Arc<dyn AffiliationRepository>,
    pub coupons: Arc<dyn CouponRepository>,
}

impl AppState {
    pub fn new(repos: Repositories, business_rules: &BusinessRules) -> Self {
        let guard = DependencyGuard::new(business_rules.dependency_timeout());

        let directory = StoreDirectory::new(repos.stores, guard);
        let catalog = DealCatalog::new(repos.deals, directory.clone(), guard);
        let graph = AffiliationGraphBuilder::new(directory.clone(), repos.affiliations.clone(), guard);
        let selector = PartnerDealSelector::new(directory, catalog.clone(), repos.affiliations, guard)
            .with_limit(business_rules.partner_deal_limit)
            .with_expiry_days(business_rules.coupon_expiry_days);
        let coupons = CouponEngine::new(repos.coupons, guard)
            .with_expiry_enforcement(business_rules.enforce_coupon_expiry);

        Self { catalog, graph, selector, coupons }
    }
}
