use std::collections::HashMap;

use crate::api::types::Transaction;
use crate::store::paginated::TransactionPage;

/// Build the list to render: the authoritative transactions with confirmed
/// approval overrides applied.
///
/// Paginated data wins when present, then the employee's transactions, else
/// nothing. Inputs are never modified.
pub fn derive_transactions(
  paginated: Option<&TransactionPage>,
  by_employee: Option<&[Transaction]>,
  overrides: &HashMap<String, bool>,
) -> Vec<Transaction> {
  let source: &[Transaction] = match (paginated, by_employee) {
    (Some(page), _) => &page.data,
    (None, Some(transactions)) => transactions,
    (None, None) => &[],
  };

  source
    .iter()
    .map(|transaction| Transaction {
      approved: overrides
        .get(&transaction.id)
        .copied()
        .unwrap_or(transaction.approved),
      ..transaction.clone()
    })
    .collect()
}
