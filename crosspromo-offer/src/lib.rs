pub mod affiliation;
pub mod selector;

pub use affiliation::{derive_affiliations, AffiliationGraphBuilder, RegenerationReport};
pub use selector::PartnerDealSelector;
