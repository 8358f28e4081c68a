use std::sync::Arc;
use crosspromo_core::repository::StoreRepository;
use crosspromo_core::{CoreError, CoreResult, DependencyGuard};
use crosspromo_shared::{Store, StoreId};

/// Read access to store identity, category and display metadata
#[derive(Clone)]
pub struct StoreDirectory {
    repo: Arc<dyn StoreRepository>,
    guard: DependencyGuard,
}

impl StoreDirectory {
    pub fn new(repo: Arc<dyn StoreRepository>, guard: DependencyGuard) -> Self {
        Self { repo, guard }
    }

    pub async fn list_stores(&self) -> CoreResult<Vec<Store>> {
        self.guard.call("list stores", self.repo.list_stores()).await
    }

    pub async fn get_store(&self, id: &StoreId) -> CoreResult<Store> {
        self.guard
            .call("get store", self.repo.get_store(id))
            .await?
            .ok_or_else(|| CoreError::not_found(format!("store {}", id)))
    }

    /// Stores for the given ids; unknown ids are left out.
    pub async fn get_stores(&self, ids: &[StoreId]) -> CoreResult<Vec<Store>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.guard.call("list stores by id", self.repo.list_stores_by_ids(ids)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspromo_store::InMemoryStore;

    fn directory() -> (Arc<InMemoryStore>, StoreDirectory) {
        let mem = Arc::new(InMemoryStore::new());
        mem.insert_store(Store::new("cafe-1", "Morning Cafe", Some("cafe"))).unwrap();
        mem.insert_store(Store::new("nail-1", "Nail Studio", Some("beauty"))).unwrap();
        let directory = StoreDirectory::new(mem.clone(), DependencyGuard::default());
        (mem, directory)
    }

    #[tokio::test]
    async fn test_get_store() {
        let (_, directory) = directory();
        let store = directory.get_store(&"cafe-1".into()).await.unwrap();
        assert_eq!(store.name, "Morning Cafe");
    }

    #[tokio::test]
    async fn test_missing_store_is_not_found() {
        let (_, directory) = directory();
        let result = directory.get_store(&"ghost".into()).await;
        assert!(matches!(result, Err(CoreError::NotFoundError(_))));
    }

    #[tokio::test]
    async fn test_get_stores_skips_unknown_ids() {
        let (_, directory) = directory();
        let stores = directory
            .get_stores(&["nail-1".into(), "ghost".into()])
            .await
            .unwrap();
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].id, StoreId::from("nail-1"));
    }

    #[tokio::test]
    async fn test_unavailable_backend_is_dependency_error() {
        let (mem, directory) = directory();
        mem.set_unavailable(true);
        let result = directory.list_stores().await;
        assert!(matches!(result, Err(CoreError::DependencyError(_))));
    }
}
