//! The data provider seam: named operations answered with JSON.

use color_eyre::Result;
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;

/// Operations understood by a data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
  Employees,
  PaginatedTransactions,
  TransactionsByEmployee,
  SetTransactionApproval,
}

impl Operation {
  /// Wire name of the operation
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Employees => "employees",
      Self::PaginatedTransactions => "paginatedTransactions",
      Self::TransactionsByEmployee => "transactionsByEmployee",
      Self::SetTransactionApproval => "setTransactionApproval",
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// External source of employees and transactions.
///
/// Implementations return `'static` futures so calls can be moved into
/// spawned tasks.
pub trait DataProvider: Send + Sync {
  /// Execute an operation with JSON params, returning the JSON result
  fn call(&self, operation: Operation, params: Value) -> BoxFuture<'static, Result<Value>>;

  /// Short label for the header (e.g. the API host)
  fn describe(&self) -> String;
}
