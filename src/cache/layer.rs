//! Cache layer that orchestrates caching logic with network fetching.

use color_eyre::Result;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use super::{CacheResult, CacheStorage, QueryKey};

/// Cache layer that manages caching logic and network fetching.
///
/// This layer sits between the fetcher and the data provider. Entries never
/// expire on their own; they live until their scope is invalidated.
#[derive(Clone)]
pub struct CacheLayer {
  storage: Arc<dyn CacheStorage>,
}

impl CacheLayer {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: impl CacheStorage + 'static) -> Self {
    Self {
      storage: Arc::new(storage),
    }
  }

  /// Fetch with cache-first strategy.
  ///
  /// 1. Check cache - on a hit, return without calling the fetcher
  /// 2. On a miss, call the fetcher and store its result
  ///
  /// Fetcher errors propagate and nothing is stored.
  pub async fn fetch<K, F, Fut>(&self, key: &K, fetcher: F) -> Result<CacheResult<Value>>
  where
    K: QueryKey,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value>>,
  {
    let hash = key.cache_hash();

    if let Some(cached) = self.storage.get(&hash)? {
      debug!(query = %key.description(), cached_at = %cached.cached_at, "cache hit");
      return Ok(CacheResult::from_cache(cached.value, cached.cached_at));
    }

    debug!(query = %key.description(), "cache miss");
    let data = fetcher().await?;
    self.storage.store(&hash, key.scope(), &data)?;
    Ok(CacheResult::from_network(data))
  }

  /// Drop every entry stored under the given scope.
  pub fn invalidate_scope(&self, scope: &str) -> Result<usize> {
    let removed = self.storage.remove_scope(scope)?;
    debug!(scope, removed, "cache scope invalidated");
    Ok(removed)
  }
}
