pub mod directory;
pub mod deals;

pub use directory::StoreDirectory;
pub use deals::DealCatalog;
