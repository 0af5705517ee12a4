//! Data stores fed by the fetcher.
//!
//! Each store owns its state in a watch cell: the owner mutates it, any
//! number of readers subscribe and always see the latest value.

mod by_employee;
mod employees;
pub mod paginated;

pub use by_employee::EmployeeTransactionStore;
pub use employees::EmployeeStore;
pub use paginated::{PaginatedTransactionStore, TransactionPage};

use tokio::sync::watch;

/// Data held by a store plus whether a fetch is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
  /// `None` until the first successful fetch, and again after invalidation
  pub data: Option<T>,
  pub loading: bool,
}

impl<T> Default for StoreState<T> {
  fn default() -> Self {
    Self {
      data: None,
      loading: false,
    }
  }
}

/// Single-writer state cell with read-only subscribers.
#[derive(Debug)]
pub struct Shared<T> {
  tx: watch::Sender<T>,
}

impl<T> Shared<T> {
  pub fn new(value: T) -> Self {
    let (tx, _rx) = watch::channel(value);
    Self { tx }
  }

  /// Mutate in place and notify subscribers
  pub fn modify(&self, f: impl FnOnce(&mut T)) {
    self.tx.send_modify(f);
  }

  pub fn borrow(&self) -> watch::Ref<'_, T> {
    self.tx.borrow()
  }

  /// Read-only handle for consumers
  pub fn subscribe(&self) -> watch::Receiver<T> {
    self.tx.subscribe()
  }
}

impl<T: Default> Default for Shared<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}
