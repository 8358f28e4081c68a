pub mod issue;
pub mod engine;

pub use issue::IssueCouponRequest;
pub use engine::{CouponEngine, REDEMPTION_FAILED_MESSAGE};
