//! Fetcher that wraps a DataProvider with transparent response caching.

use color_eyre::{eyre::WrapErr, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::cache::{CacheLayer, CacheSource, MemoryStorage, NoopStorage};

use super::cache::RequestKey;
use super::provider::{DataProvider, Operation};

/// Issues named operations against a provider.
///
/// Clones share the same provider and the same response cache.
#[derive(Clone)]
pub struct Fetcher {
  provider: Arc<dyn DataProvider>,
  cache: CacheLayer,
}

impl Fetcher {
  /// Create a fetcher. With `cache_enabled` false every cached request goes
  /// straight to the provider.
  pub fn new(provider: Arc<dyn DataProvider>, cache_enabled: bool) -> Self {
    let cache = if cache_enabled {
      CacheLayer::new(MemoryStorage::new())
    } else {
      CacheLayer::new(NoopStorage)
    };

    Self { provider, cache }
  }

  /// Request with caching: identical operation + params are answered from
  /// the cache after the first successful call.
  pub async fn request<T, P>(&self, operation: Operation, params: &P) -> Result<T>
  where
    T: DeserializeOwned,
    P: Serialize + ?Sized,
  {
    let params = serde_json::to_value(params)
      .wrap_err_with(|| format!("Failed to encode params for {}", operation))?;
    let key = RequestKey::new(operation, params.clone());

    let result = self
      .cache
      .fetch(&key, || self.provider.call(operation, params))
      .await?;
    let cached = result.source == CacheSource::Cache;
    debug!(%operation, cached, cached_at = ?result.cached_at, "request served");

    serde_json::from_value(result.data)
      .wrap_err_with(|| format!("Failed to decode {} response", operation))
  }

  /// Request that always reaches the provider and never touches the cache.
  pub async fn request_without_cache<T, P>(&self, operation: Operation, params: &P) -> Result<T>
  where
    T: DeserializeOwned,
    P: Serialize + ?Sized,
  {
    let params = serde_json::to_value(params)
      .wrap_err_with(|| format!("Failed to encode params for {}", operation))?;

    debug!(%operation, "uncached request");
    let value = self.provider.call(operation, params).await?;

    serde_json::from_value(value)
      .wrap_err_with(|| format!("Failed to decode {} response", operation))
  }

  /// Drop cached responses of the given operations only.
  pub fn clear_cache_by_operation(&self, operations: &[Operation]) -> Result<()> {
    for operation in operations {
      self.cache.invalidate_scope(operation.as_str())?;
    }
    Ok(())
  }

  pub fn provider_label(&self) -> String {
    self.provider.describe()
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::api::types::PaginatedRequestParams;
  use color_eyre::eyre::eyre;
  use futures::future::{BoxFuture, FutureExt};
  use serde_json::{json, Value};
  use std::sync::Mutex;

  /// Provider that replays canned responses and records every call.
  #[derive(Default)]
  pub(crate) struct RecordingProvider {
    responses: Mutex<Vec<(Operation, Value, Result<Value, String>)>>,
    pub(crate) calls: Mutex<Vec<(Operation, Value)>>,
  }

  impl RecordingProvider {
    pub(crate) fn respond(&self, operation: Operation, params: Value, result: Value) {
      self
        .responses
        .lock()
        .unwrap()
        .push((operation, params, Ok(result)));
    }

    pub(crate) fn fail(&self, operation: Operation, params: Value, message: &str) {
      self
        .responses
        .lock()
        .unwrap()
        .push((operation, params, Err(message.to_string())));
    }

    pub(crate) fn call_count(&self, operation: Operation) -> usize {
      self
        .calls
        .lock()
        .unwrap()
        .iter()
        .filter(|(op, _)| *op == operation)
        .count()
    }
  }

  impl DataProvider for RecordingProvider {
    fn call(&self, operation: Operation, params: Value) -> BoxFuture<'static, Result<Value>> {
      self.calls.lock().unwrap().push((operation, params.clone()));
      let result = self
        .responses
        .lock()
        .unwrap()
        .iter()
        .find(|(op, p, _)| *op == operation && *p == params)
        .map(|(_, _, r)| r.clone())
        .unwrap_or_else(|| Err(format!("no response for {} {}", operation, params)));
      async move { result.map_err(|e| eyre!(e)) }.boxed()
    }

    fn describe(&self) -> String {
      "recording".to_string()
    }
  }

  fn fetcher_with(provider: Arc<RecordingProvider>) -> Fetcher {
    Fetcher::new(provider, true)
  }

  #[tokio::test]
  async fn test_cached_request_hits_provider_once() {
    let provider = Arc::new(RecordingProvider::default());
    provider.respond(Operation::Employees, Value::Null, json!([]));
    let fetcher = fetcher_with(provider.clone());

    for _ in 0..3 {
      let employees: Vec<Value> = fetcher.request(Operation::Employees, &()).await.unwrap();
      assert!(employees.is_empty());
    }
    assert_eq!(provider.call_count(Operation::Employees), 1);
  }

  #[tokio::test]
  async fn test_different_params_are_cached_separately() {
    let provider = Arc::new(RecordingProvider::default());
    provider.respond(
      Operation::PaginatedTransactions,
      json!({ "page": 1 }),
      json!({ "data": [], "nextPage": 2 }),
    );
    provider.respond(
      Operation::PaginatedTransactions,
      json!({ "page": 2 }),
      json!({ "data": [], "nextPage": null }),
    );
    let fetcher = fetcher_with(provider.clone());

    for page in [1, 2, 1, 2] {
      let _: Value = fetcher
        .request(
          Operation::PaginatedTransactions,
          &PaginatedRequestParams { page: Some(page) },
        )
        .await
        .unwrap();
    }
    assert_eq!(provider.call_count(Operation::PaginatedTransactions), 2);
  }

  #[tokio::test]
  async fn test_uncached_request_always_hits_provider() {
    let provider = Arc::new(RecordingProvider::default());
    provider.respond(Operation::Employees, Value::Null, json!([]));
    let fetcher = fetcher_with(provider.clone());

    let _: Value = fetcher.request(Operation::Employees, &()).await.unwrap();
    let _: Value = fetcher
      .request_without_cache(Operation::Employees, &())
      .await
      .unwrap();
    let _: Value = fetcher
      .request_without_cache(Operation::Employees, &())
      .await
      .unwrap();
    // Uncached calls did not populate or consult the cache
    let _: Value = fetcher.request(Operation::Employees, &()).await.unwrap();

    assert_eq!(provider.call_count(Operation::Employees), 3);
  }

  #[tokio::test]
  async fn test_provider_errors_propagate() {
    let provider = Arc::new(RecordingProvider::default());
    provider.fail(Operation::Employees, Value::Null, "boom");
    let fetcher = fetcher_with(provider);

    let result: Result<Value> = fetcher.request(Operation::Employees, &()).await;
    assert!(format!("{:#}", result.unwrap_err()).contains("boom"));
  }

  #[tokio::test]
  async fn test_clear_cache_by_operation() {
    let provider = Arc::new(RecordingProvider::default());
    provider.respond(Operation::Employees, Value::Null, json!([]));
    provider.respond(
      Operation::TransactionsByEmployee,
      json!({ "employeeId": "e1" }),
      json!([]),
    );
    let fetcher = fetcher_with(provider.clone());
    let by_employee = json!({ "employeeId": "e1" });

    let _: Value = fetcher.request(Operation::Employees, &()).await.unwrap();
    let _: Value = fetcher
      .request(Operation::TransactionsByEmployee, &by_employee)
      .await
      .unwrap();

    fetcher
      .clear_cache_by_operation(&[Operation::TransactionsByEmployee])
      .unwrap();

    let _: Value = fetcher.request(Operation::Employees, &()).await.unwrap();
    let _: Value = fetcher
      .request(Operation::TransactionsByEmployee, &by_employee)
      .await
      .unwrap();

    assert_eq!(provider.call_count(Operation::Employees), 1);
    assert_eq!(provider.call_count(Operation::TransactionsByEmployee), 2);
  }

  #[tokio::test]
  async fn test_disabled_cache() {
    let provider = Arc::new(RecordingProvider::default());
    provider.respond(Operation::Employees, Value::Null, json!([]));
    let fetcher = Fetcher::new(provider.clone(), false);

    let _: Value = fetcher.request(Operation::Employees, &()).await.unwrap();
    let _: Value = fetcher.request(Operation::Employees, &()).await.unwrap();
    assert_eq!(provider.call_count(Operation::Employees), 2);
  }
}
