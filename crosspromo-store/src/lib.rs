pub mod app_config;
pub mod database;
pub mod store_repo;
pub mod deal_repo;
pub mod affiliation_repo;
pub mod coupon_repo;
pub mod memory;

pub use database::DbClient;
pub use store_repo::PgStoreRepository;
pub use deal_repo::PgDealRepository;
pub use affiliation_repo::PgAffiliationRepository;
pub use coupon_repo::PgCouponRepository;
pub use memory::InMemoryStore;
