use color_eyre::Result;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::types::{PaginatedRequestParams, PaginatedResponse, Transaction};
use crate::api::{Fetcher, Operation};

use super::{Shared, StoreState};

/// Page number requested when the store holds no data
const FIRST_PAGE: u32 = 1;

pub type TransactionPage = PaginatedResponse<Vec<Transaction>>;

/// All transactions, accumulated page by page.
pub struct PaginatedTransactionStore {
  fetcher: Fetcher,
  state: Shared<StoreState<TransactionPage>>,
}

impl PaginatedTransactionStore {
  pub fn new(fetcher: Fetcher) -> Self {
    Self {
      fetcher,
      state: Shared::default(),
    }
  }

  /// Fetch the next page and append it to the accumulated list.
  ///
  /// Starts at page 1 when the store is empty, otherwise follows the cursor
  /// of the last response. When the last response had no cursor there is
  /// nothing left to load and no request is made.
  pub async fn fetch_all(&self) -> Result<()> {
    let page = match &self.state.borrow().data {
      None => FIRST_PAGE,
      Some(current) => match current.next_page {
        Some(next) => next,
        None => {
          debug!("last page already loaded, skipping fetch");
          return Ok(());
        }
      },
    };

    self.state.modify(|s| s.loading = true);

    let result = self
      .fetcher
      .request::<TransactionPage, _>(
        Operation::PaginatedTransactions,
        &PaginatedRequestParams { page: Some(page) },
      )
      .await;

    match result {
      Ok(response) => {
        info!(page, count = response.data.len(), next_page = ?response.next_page, "transactions page loaded");
        self.state.modify(|s| {
          s.data = Some(merge_page(s.data.take(), response));
          s.loading = false;
        });
        Ok(())
      }
      Err(e) => {
        self.state.modify(|s| s.loading = false);
        Err(e)
      }
    }
  }

  /// Forget all loaded pages; the next fetch starts from page 1.
  pub fn invalidate_data(&self) {
    self.state.modify(|s| s.data = None);
  }

  #[cfg(test)]
  pub fn data(&self) -> Option<TransactionPage> {
    self.state.borrow().data.clone()
  }

  #[cfg(test)]
  pub fn is_loading(&self) -> bool {
    self.state.borrow().loading
  }

  pub fn subscribe(&self) -> watch::Receiver<StoreState<TransactionPage>> {
    self.state.subscribe()
  }
}

/// Append a new page to what was loaded so far. The cursor always comes from
/// the newest response.
fn merge_page(previous: Option<TransactionPage>, response: TransactionPage) -> TransactionPage {
  match previous {
    None => response,
    Some(mut previous) => {
      previous.data.extend(response.data);
      PaginatedResponse {
        data: previous.data,
        next_page: response.next_page,
      }
    }
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::api::fetcher::tests::RecordingProvider;
  use serde_json::{json, Value};
  use std::sync::Arc;

  pub(crate) fn transaction_json(id: &str, employee_id: &str, approved: bool) -> Value {
    json!({
      "id": id,
      "amount": 10.0,
      "employee": { "id": employee_id, "firstName": "Test", "lastName": employee_id },
      "merchant": "Acme",
      "date": "2024-01-01",
      "approved": approved
    })
  }

  fn ids(page: &TransactionPage) -> Vec<&str> {
    page.data.iter().map(|t| t.id.as_str()).collect()
  }

  fn two_page_provider() -> Arc<RecordingProvider> {
    let provider = Arc::new(RecordingProvider::default());
    provider.respond(
      Operation::PaginatedTransactions,
      json!({ "page": 1 }),
      json!({
        "data": [transaction_json("t1", "e1", false), transaction_json("t2", "e2", false)],
        "nextPage": 2
      }),
    );
    provider.respond(
      Operation::PaginatedTransactions,
      json!({ "page": 2 }),
      json!({ "data": [transaction_json("t3", "e1", true)], "nextPage": null }),
    );
    provider
  }

  #[tokio::test]
  async fn test_two_fetches_concatenate_pages() {
    let store = PaginatedTransactionStore::new(Fetcher::new(two_page_provider(), true));

    store.fetch_all().await.unwrap();
    let first = store.data().unwrap();
    assert_eq!(ids(&first), vec!["t1", "t2"]);
    assert_eq!(first.next_page, Some(2));

    store.fetch_all().await.unwrap();
    let both = store.data().unwrap();
    assert_eq!(ids(&both), vec!["t1", "t2", "t3"]);
    assert_eq!(both.next_page, None);
    assert!(!store.is_loading());
  }

  #[tokio::test]
  async fn test_fetch_after_last_page_is_a_noop() {
    let provider = two_page_provider();
    let store = PaginatedTransactionStore::new(Fetcher::new(provider.clone(), false));

    store.fetch_all().await.unwrap();
    store.fetch_all().await.unwrap();
    store.fetch_all().await.unwrap();

    assert_eq!(provider.call_count(Operation::PaginatedTransactions), 2);
    assert_eq!(ids(&store.data().unwrap()), vec!["t1", "t2", "t3"]);
  }

  #[tokio::test]
  async fn test_invalidate_restarts_at_first_page() {
    let store = PaginatedTransactionStore::new(Fetcher::new(two_page_provider(), true));

    store.fetch_all().await.unwrap();
    store.fetch_all().await.unwrap();
    store.invalidate_data();
    assert_eq!(store.data(), None);

    store.fetch_all().await.unwrap();
    let page = store.data().unwrap();
    assert_eq!(ids(&page), vec!["t1", "t2"]);
    assert_eq!(page.next_page, Some(2));
  }

  #[tokio::test]
  async fn test_failure_clears_loading_and_keeps_data() {
    let provider = Arc::new(RecordingProvider::default());
    provider.respond(
      Operation::PaginatedTransactions,
      json!({ "page": 1 }),
      json!({ "data": [transaction_json("t1", "e1", false)], "nextPage": 2 }),
    );
    provider.fail(
      Operation::PaginatedTransactions,
      json!({ "page": 2 }),
      "timeout",
    );
    let store = PaginatedTransactionStore::new(Fetcher::new(provider, true));

    store.fetch_all().await.unwrap();
    assert!(store.fetch_all().await.is_err());

    assert!(!store.is_loading());
    assert_eq!(ids(&store.data().unwrap()), vec!["t1"]);
  }
}
