//! In-memory provider backed by a JSON fixture.
//!
//! Serves the same operations as a real API with a simulated latency, so the
//! UI can be exercised without a backend.

use color_eyre::{
  eyre::{eyre, WrapErr},
  Result,
};
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use super::provider::{DataProvider, Operation};
use super::types::{
  Employee, PaginatedRequestParams, PaginatedResponse, RequestByEmployeeParams,
  SetTransactionApprovalParams, Transaction,
};

const BUILTIN_FIXTURE: &str = include_str!("../../fixtures/data.json");

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Dataset served by the mock provider
#[derive(Debug, Clone, Deserialize)]
pub struct MockData {
  pub employees: Vec<Employee>,
  pub transactions: Vec<Transaction>,
}

#[derive(Clone)]
pub struct MockProvider {
  data: Arc<Mutex<MockData>>,
  page_size: usize,
  latency: Duration,
  source: Option<PathBuf>,
}

impl MockProvider {
  pub fn new(data: MockData) -> Self {
    Self {
      data: Arc::new(Mutex::new(data)),
      page_size: DEFAULT_PAGE_SIZE,
      latency: Duration::ZERO,
      source: None,
    }
  }

  /// Provider over the fixture compiled into the binary
  pub fn builtin() -> Result<Self> {
    let data: MockData =
      serde_json::from_str(BUILTIN_FIXTURE).wrap_err("Failed to parse built-in fixture")?;
    Ok(Self::new(data))
  }

  /// Provider over a fixture file
  pub fn from_file(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read fixture {}: {}", path.display(), e))?;

    let data: MockData = serde_json::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse fixture {}: {}", path.display(), e))?;

    Ok(Self {
      source: Some(path.to_path_buf()),
      ..Self::new(data)
    })
  }

  pub fn with_page_size(mut self, page_size: usize) -> Self {
    self.page_size = page_size.max(1);
    self
  }

  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  /// Answer an operation synchronously against the dataset
  fn handle(&self, operation: Operation, params: Value) -> Result<Value> {
    let mut data = self
      .data
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    match operation {
      Operation::Employees => Ok(serde_json::to_value(&data.employees)?),
      Operation::PaginatedTransactions => {
        let params: PaginatedRequestParams =
          serde_json::from_value(params).wrap_err("Invalid paginatedTransactions params")?;
        let page = params.page.ok_or_else(|| eyre!("Page is null"))?;
        let response = paginate(&data.transactions, page, self.page_size)?;
        Ok(serde_json::to_value(response)?)
      }
      Operation::TransactionsByEmployee => {
        let params: RequestByEmployeeParams =
          serde_json::from_value(params).wrap_err("Invalid transactionsByEmployee params")?;
        if params.employee_id.is_empty() {
          return Err(eyre!("Employee id cannot be empty"));
        }

        let transactions: Vec<&Transaction> = data
          .transactions
          .iter()
          .filter(|t| t.employee.id == params.employee_id)
          .collect();
        Ok(serde_json::to_value(transactions)?)
      }
      Operation::SetTransactionApproval => {
        let params: SetTransactionApprovalParams =
          serde_json::from_value(params).wrap_err("Invalid setTransactionApproval params")?;

        let transaction = data
          .transactions
          .iter_mut()
          .find(|t| t.id == params.transaction_id)
          .ok_or_else(|| eyre!("Invalid transaction to approve"))?;
        transaction.approved = params.value;
        Ok(Value::Null)
      }
    }
  }
}

/// Slice one 1-based page out of the dataset
fn paginate(
  transactions: &[Transaction],
  page: u32,
  page_size: usize,
) -> Result<PaginatedResponse<Vec<Transaction>>> {
  if page < 1 {
    return Err(eyre!("Page must be at least 1, got {}", page));
  }

  let page_count = transactions.len().div_ceil(page_size);
  let start = (page as usize - 1) * page_size;
  let data = transactions
    .iter()
    .skip(start)
    .take(page_size)
    .cloned()
    .collect();

  let next_page = if (page as usize) < page_count {
    Some(page + 1)
  } else {
    None
  };

  Ok(PaginatedResponse { data, next_page })
}

impl DataProvider for MockProvider {
  fn call(&self, operation: Operation, params: Value) -> BoxFuture<'static, Result<Value>> {
    let provider = self.clone();

    async move {
      if !provider.latency.is_zero() {
        tokio::time::sleep(provider.latency).await;
      }
      debug!(%operation, %params, "mock request");
      provider.handle(operation, params)
    }
    .boxed()
  }

  fn describe(&self) -> String {
    match &self.source {
      Some(path) => format!("mock ({})", path.display()),
      None => "mock".to_string(),
    }
  }
}
