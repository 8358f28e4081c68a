use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use serde::Serialize;
use tracing::{info, warn};
use crosspromo_catalog::StoreDirectory;
use crosspromo_core::repository::AffiliationRepository;
use crosspromo_core::{CoreResult, DependencyGuard};
use crosspromo_shared::{Affiliation, Store, StoreId};

/// Derive every canonical cross-category pair from a store set.
///
/// Stores are grouped by category and each group is only paired with the
/// groups after it, which produces the same set as scanning all ordered pairs
/// and rejecting self-pairs and same-category pairs. Stores without a
/// category are left out entirely. Duplicate ids in the input collapse
/// through the dedup set. The result is sorted.
pub fn derive_affiliations(stores: &[Store]) -> Vec<Affiliation> {
    let mut by_category: BTreeMap<&str, Vec<&StoreId>> = BTreeMap::new();
    for store in stores {
        if let Some(category) = store.category.as_deref() {
            by_category.entry(category).or_default().push(&store.id);
        }
    }

    let groups: Vec<&Vec<&StoreId>> = by_category.values().collect();
    let mut pairs = BTreeSet::new();

    for (i, group) in groups.iter().enumerate() {
        for other in groups.iter().skip(i + 1) {
            for a in group.iter() {
                for b in other.iter() {
                    if let Some(pair) = Affiliation::canonical((*a).clone(), (*b).clone()) {
                        pairs.insert(pair);
                    }
                }
            }
        }
    }

    pairs.into_iter().collect()
}

/// Outcome of one regeneration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerationReport {
    pub stores_scanned: usize,
    pub pairs_derived: usize,
    /// Pairs that were not already stored
    pub pairs_inserted: u64,
}

/// Rebuilds the affiliation table from the current store directory.
///
/// Safe to re-run: the write ignores pairs that already exist, so a run after
/// directory changes only adds new pairs.
#[derive(Clone)]
pub struct AffiliationGraphBuilder {
    directory: StoreDirectory,
    repo: Arc<dyn AffiliationRepository>,
    guard: DependencyGuard,
}

impl AffiliationGraphBuilder {
    pub fn new(directory: StoreDirectory, repo: Arc<dyn AffiliationRepository>, guard: DependencyGuard) -> Self {
        Self { directory, repo, guard }
    }

    pub async fn regenerate(&self) -> CoreResult<RegenerationReport> {
        let stores = self.directory.list_stores().await?;
        if stores.is_empty() {
            warn!("No stores in directory, skipping affiliation regeneration");
            return Ok(RegenerationReport { stores_scanned: 0, pairs_derived: 0, pairs_inserted: 0 });
        }

        let pairs = derive_affiliations(&stores);
        info!("Derived {} affiliation pairs from {} stores", pairs.len(), stores.len());

        let pairs_inserted = if pairs.is_empty() {
            0
        } else {
            self.guard.call("upsert affiliations", self.repo.upsert_affiliations(&pairs)).await?
        };

        info!("Affiliation regeneration complete: {} new pairs", pairs_inserted);
        Ok(RegenerationReport {
            stores_scanned: stores.len(),
            pairs_derived: pairs.len(),
            pairs_inserted,
        })
    }
}
