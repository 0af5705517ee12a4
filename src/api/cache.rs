//! Cache keys for provider requests.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::cache::QueryKey;

use super::provider::Operation;

/// Cache key for one provider request: operation name + parameters.
#[derive(Clone, Debug)]
pub struct RequestKey {
  operation: Operation,
  params: Value,
}

impl RequestKey {
  pub fn new(operation: Operation, params: Value) -> Self {
    Self { operation, params }
  }
}

impl QueryKey for RequestKey {
  fn cache_hash(&self) -> String {
    // serde_json objects are key-sorted, so equal params serialize equally
    let input = format!("{}:{}", self.operation, self.params);

    // SHA256 hash for stable, fixed-length keys
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
  }

  fn scope(&self) -> &str {
    self.operation.as_str()
  }

  fn description(&self) -> String {
    if self.params.is_null() {
      self.operation.to_string()
    } else {
      format!("{} {}", self.operation, self.params)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_same_request_same_hash() {
    let a = RequestKey::new(Operation::PaginatedTransactions, json!({ "page": 1 }));
    let b = RequestKey::new(Operation::PaginatedTransactions, json!({ "page": 1 }));
    assert_eq!(a.cache_hash(), b.cache_hash());
    assert_eq!(a.cache_hash().len(), 64);
  }

  #[test]
  fn test_params_change_hash() {
    let a = RequestKey::new(Operation::PaginatedTransactions, json!({ "page": 1 }));
    let b = RequestKey::new(Operation::PaginatedTransactions, json!({ "page": 2 }));
    assert_ne!(a.cache_hash(), b.cache_hash());
  }

  #[test]
  fn test_operation_changes_hash() {
    let a = RequestKey::new(Operation::Employees, Value::Null);
    let b = RequestKey::new(Operation::TransactionsByEmployee, Value::Null);
    assert_ne!(a.cache_hash(), b.cache_hash());
  }

  #[test]
  fn test_description() {
    let key = RequestKey::new(Operation::Employees, Value::Null);
    assert_eq!(key.description(), "employees");

    let key = RequestKey::new(
      Operation::TransactionsByEmployee,
      json!({ "employeeId": "e1" }),
    );
    assert_eq!(key.description(), r#"transactionsByEmployee {"employeeId":"e1"}"#);
  }
}
