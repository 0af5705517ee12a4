use color_eyre::Result;
use tokio::sync::watch;
use tracing::info;

use crate::api::types::{RequestByEmployeeParams, Transaction};
use crate::api::{Fetcher, Operation};

use super::{Shared, StoreState};

/// Transactions of a single employee.
pub struct EmployeeTransactionStore {
  fetcher: Fetcher,
  state: Shared<StoreState<Vec<Transaction>>>,
}

impl EmployeeTransactionStore {
  pub fn new(fetcher: Fetcher) -> Self {
    Self {
      fetcher,
      state: Shared::default(),
    }
  }

  /// Replace the held transactions with the given employee's full set.
  pub async fn fetch_by_id(&self, employee_id: &str) -> Result<()> {
    self.state.modify(|s| s.loading = true);

    let result = self
      .fetcher
      .request::<Vec<Transaction>, _>(
        Operation::TransactionsByEmployee,
        &RequestByEmployeeParams {
          employee_id: employee_id.to_string(),
        },
      )
      .await;

    match result {
      Ok(transactions) => {
        info!(employee_id, count = transactions.len(), "employee transactions loaded");
        self.state.modify(|s| {
          s.data = Some(transactions);
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

  pub fn invalidate_data(&self) {
    self.state.modify(|s| s.data = None);
  }

  #[cfg(test)]
  pub fn data(&self) -> Option<Vec<Transaction>> {
    self.state.borrow().data.clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<StoreState<Vec<Transaction>>> {
    self.state.subscribe()
  }
}
