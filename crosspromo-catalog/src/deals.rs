use std::sync::Arc;
use tracing::info;
use crosspromo_core::repository::DealRepository;
use crosspromo_core::{CoreError, CoreResult, DependencyGuard};
use crosspromo_shared::{DealTemplate, NewDealTemplate, StoreId};
use crate::directory::StoreDirectory;

/// Reusable coupon offers, each owned by one store
#[derive(Clone)]
pub struct DealCatalog {
    repo: Arc<dyn DealRepository>,
    directory: StoreDirectory,
    guard: DependencyGuard,
}

impl DealCatalog {
    pub fn new(repo: Arc<dyn DealRepository>, directory: StoreDirectory, guard: DependencyGuard) -> Self {
        Self { repo, directory, guard }
    }

    pub async fn list_by_owners(&self, owner_ids: &[StoreId]) -> CoreResult<Vec<DealTemplate>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.guard.call("list deals by owner", self.repo.list_deals_by_owners(owner_ids)).await
    }

    /// Self-service creation of a deal by its owning store.
    pub async fn create_deal(
        &self,
        store_id: &StoreId,
        description: &str,
        conditions: Option<&str>,
    ) -> CoreResult<DealTemplate> {
        let description = description.trim();
        if description.is_empty() {
            return Err(CoreError::validation("deal description is required"));
        }

        // Ownership must point at a real store
        self.directory.get_store(store_id).await?;

        let new_deal = NewDealTemplate {
            store_id: store_id.clone(),
            description: description.to_string(),
            conditions: conditions.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
        };
        let deal = self.guard.call("insert deal", self.repo.insert_deal(&new_deal)).await?;

        info!("Created deal {} for store {}", deal.id, store_id);
        Ok(deal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspromo_shared::Store;
    use crosspromo_store::InMemoryStore;

    fn catalog() -> DealCatalog {
        let mem = Arc::new(InMemoryStore::new());
        mem.insert_store(Store::new("cafe-1", "Morning Cafe", Some("cafe"))).unwrap();
        mem.insert_store(Store::new("nail-1", "Nail Studio", Some("beauty"))).unwrap();
        let guard = DependencyGuard::default();
        DealCatalog::new(mem.clone(), StoreDirectory::new(mem, guard), guard)
    }

    #[tokio::test]
    async fn test_create_and_list_by_owner() {
        let catalog = catalog();
        catalog.create_deal(&"cafe-1".into(), "Free cookie", None).await.unwrap();
        catalog.create_deal(&"nail-1".into(), "  10% off  ", Some(" ")).await.unwrap();

        let deals = catalog.list_by_owners(&["nail-1".into()]).await.unwrap();
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].description, "10% off");
        assert_eq!(deals[0].conditions, None);
    }

    #[tokio::test]
    async fn test_blank_description_rejected() {
        let catalog = catalog();
        let result = catalog.create_deal(&"cafe-1".into(), "   ", None).await;
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_unknown_owner_rejected() {
        let catalog = catalog();
        let result = catalog.create_deal(&"ghost".into(), "Free cookie", None).await;
        assert!(matches!(result, Err(CoreError::NotFoundError(_))));
    }

    #[tokio::test]
    async fn test_no_owners_no_deals() {
        let catalog = catalog();
        assert!(catalog.list_by_owners(&[]).await.unwrap().is_empty());
    }
}
