pub mod affiliation;
pub mod coupon;
pub mod deal;
pub mod store;
