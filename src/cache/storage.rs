//! Cache storage trait and in-memory implementation.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// A single cached response.
#[derive(Debug, Clone)]
pub struct CachedEntry {
  /// The stored response body
  pub value: Value,
  /// Group the entry belongs to
  pub scope: String,
  /// When the entry was stored
  pub cached_at: DateTime<Utc>,
}

/// Trait for cache storage backends.
pub trait CacheStorage: Send + Sync {
  /// Get a cached response by key.
  fn get(&self, key: &str) -> Result<Option<CachedEntry>>;

  /// Store a response under key, tagged with its scope.
  fn store(&self, key: &str, scope: &str, value: &Value) -> Result<()>;

  /// Remove every entry in the given scope, returning how many were dropped.
  fn remove_scope(&self, scope: &str) -> Result<usize>;
}

/// Storage implementation that doesn't cache anything.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStorage;

impl CacheStorage for NoopStorage {
  fn get(&self, _key: &str) -> Result<Option<CachedEntry>> {
    Ok(None) // Always miss
  }

  fn store(&self, _key: &str, _scope: &str, _value: &Value) -> Result<()> {
    Ok(()) // Discard
  }

  fn remove_scope(&self, _scope: &str) -> Result<usize> {
    Ok(0)
  }
}

/// In-memory storage that lives for the session.
#[derive(Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, CachedEntry>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CacheStorage for MemoryStorage {
  fn get(&self, key: &str) -> Result<Option<CachedEntry>> {
    let entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(entries.get(key).cloned())
  }

  fn store(&self, key: &str, scope: &str, value: &Value) -> Result<()> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    entries.insert(
      key.to_string(),
      CachedEntry {
        value: value.clone(),
        scope: scope.to_string(),
        cached_at: Utc::now(),
      },
    );
    Ok(())
  }

  fn remove_scope(&self, scope: &str) -> Result<usize> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    let before = entries.len();
    entries.retain(|_, entry| entry.scope != scope);
    Ok(before - entries.len())
  }
}
