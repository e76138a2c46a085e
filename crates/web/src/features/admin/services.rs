use storage::{ResortStore, error::Result};

/// Rebuild the cached rating aggregates of every resort
pub async fn recompute_aggregates(store: &dyn ResortStore) -> Result<u64> {
    store.recompute_aggregates().await
}
