pub mod models;
pub mod pii;

pub use models::affiliation::Affiliation;
pub use models::coupon::{CouponDealView, CouponStatus, CouponView, IssuedCoupon, NewIssuedCoupon};
pub use models::deal::{DealTemplate, NewDealTemplate, PartnerDeal, PartnerDeals};
pub use models::store::{Store, StoreId};
pub use pii::Masked;
