use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::types::Employee;
use crate::api::{Fetcher, Operation};

use super::{Shared, StoreState};

/// Full employee list, fetched once per session.
pub struct EmployeeStore {
  fetcher: Fetcher,
  state: Shared<StoreState<Vec<Employee>>>,
}

impl EmployeeStore {
  pub fn new(fetcher: Fetcher) -> Self {
    Self {
      fetcher,
      state: Shared::default(),
    }
  }

  /// Fetch all employees through the cache.
  ///
  /// A failed fetch is logged and leaves an empty list rather than an error,
  /// so the filter stays usable with just "All Employees".
  pub async fn fetch_all(&self) {
    self.state.modify(|s| s.loading = true);

    let employees = match self.fetcher.request::<Vec<Employee>, _>(Operation::Employees, &()).await {
      Ok(employees) => {
        info!(count = employees.len(), "employees loaded");
        employees
      }
      Err(e) => {
        warn!("Failed to load employees: {:#}", e);
        Vec::new()
      }
    };

    self.state.modify(|s| {
      s.data = Some(employees);
      s.loading = false;
    });
  }

  #[cfg(test)]
  pub fn data(&self) -> Option<Vec<Employee>> {
    self.state.borrow().data.clone()
  }

  #[cfg(test)]
  pub fn is_loading(&self) -> bool {
    self.state.borrow().loading
  }

  pub fn subscribe(&self) -> watch::Receiver<StoreState<Vec<Employee>>> {
    self.state.subscribe()
  }
}
