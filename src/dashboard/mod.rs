//! Review dashboard: decides which transaction store is authoritative, keeps
//! the confirmed approval overrides and derives the list to render.
//!
//! The `Dashboard` is owned by a single worker (see `worker`). The UI only
//! gets a `DashboardView` to read snapshots from and a command sender.

mod derive;
mod worker;

pub use derive::derive_transactions;
pub use worker::{spawn, DashboardHandle};

use color_eyre::Result;
use serde::de::IgnoredAny;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

use crate::api::types::{
  ApprovalChange, Employee, SetTransactionApprovalParams, Transaction,
};
use crate::api::{Fetcher, Operation};
use crate::store::{
  EmployeeStore, EmployeeTransactionStore, PaginatedTransactionStore, Shared, StoreState,
  TransactionPage,
};

/// Which store the rendered list comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
  /// Paginated list of all transactions
  #[default]
  Unfiltered,
  /// Transactions of one employee
  Employee(String),
}

/// State owned by the dashboard itself (as opposed to the stores)
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
  /// Set while employees load during a full load
  pub loading: bool,
  pub filter: Filter,
  /// Approval values confirmed by the provider, by transaction id
  pub overrides: HashMap<String, bool>,
  /// Transactions whose approval write has not been answered yet
  pub pending_approvals: HashSet<String>,
  /// Message of the last failed command, cleared on the next success
  pub last_error: Option<String>,
}

/// User intents executed by the dashboard worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Load employees and the next page of all transactions
  LoadAll,
  /// Switch the filter; an empty id clears it
  LoadByEmployee(String),
  /// Persist an approval change, then record it locally
  SetApproval(ApprovalChange),
  /// Drop cached transactions and reload the current filter
  Refresh,
}

pub struct Dashboard {
  fetcher: Fetcher,
  employees: EmployeeStore,
  paginated: PaginatedTransactionStore,
  by_employee: EmployeeTransactionStore,
  state: Arc<Shared<DashboardState>>,
}

impl Dashboard {
  pub fn new(fetcher: Fetcher) -> Self {
    Self {
      employees: EmployeeStore::new(fetcher.clone()),
      paginated: PaginatedTransactionStore::new(fetcher.clone()),
      by_employee: EmployeeTransactionStore::new(fetcher.clone()),
      state: Arc::new(Shared::default()),
      fetcher,
    }
  }

  /// Load employees first, then append the next page of all transactions.
  pub async fn load_all_transactions(&self) -> Result<()> {
    self.state.modify(|s| s.loading = true);
    self.by_employee.invalidate_data();

    // Employees must be available for the filter before transactions load
    self.employees.fetch_all().await;
    self.state.modify(|s| {
      s.loading = false;
      s.filter = Filter::Unfiltered;
    });

    self.paginated.fetch_all().await
  }

  /// Switch to one employee's transactions, or back to all of them when
  /// `employee_id` is empty.
  pub async fn load_transactions_by_employee(&self, employee_id: &str) -> Result<()> {
    self.paginated.invalidate_data();

    if employee_id.is_empty() {
      self.load_all_transactions().await?;
      self.state.modify(|s| s.filter = Filter::Unfiltered);
    } else {
      self.by_employee.fetch_by_id(employee_id).await?;
      self
        .state
        .modify(|s| s.filter = Filter::Employee(employee_id.to_string()));
    }

    Ok(())
  }

  /// Write the approval to the provider, bypassing the cache. The override is
  /// recorded only after the provider confirms.
  pub async fn handle_transaction_approval(&self, change: ApprovalChange) -> Result<()> {
    self.state.modify(|s| {
      s.pending_approvals.insert(change.transaction_id.clone());
    });

    let result = self
      .fetcher
      .request_without_cache::<IgnoredAny, _>(
        Operation::SetTransactionApproval,
        &SetTransactionApprovalParams {
          transaction_id: change.transaction_id.clone(),
          value: change.new_value,
        },
      )
      .await;

    if let Err(e) = result {
      self.state.modify(|s| {
        s.pending_approvals.remove(&change.transaction_id);
      });
      return Err(e);
    }

    info!(transaction_id = %change.transaction_id, approved = change.new_value, "approval updated");
    self.state.modify(|s| {
      s.pending_approvals.remove(&change.transaction_id);
      s.overrides.insert(change.transaction_id, change.new_value);
    });
    Ok(())
  }

  /// Drop cached transaction responses and reload the active filter.
  pub async fn refresh(&self) -> Result<()> {
    self.fetcher.clear_cache_by_operation(&[
      Operation::PaginatedTransactions,
      Operation::TransactionsByEmployee,
    ])?;

    let filter = self.state.borrow().filter.clone();
    match filter {
      Filter::Unfiltered => self.load_transactions_by_employee("").await,
      Filter::Employee(id) => self.load_transactions_by_employee(&id).await,
    }
  }

  /// Run a command, recording its failure for display.
  pub async fn execute(&self, command: Command) {
    let result = match &command {
      Command::LoadAll => self.load_all_transactions().await,
      Command::LoadByEmployee(id) => self.load_transactions_by_employee(id).await,
      Command::SetApproval(change) => self.handle_transaction_approval(change.clone()).await,
      Command::Refresh => self.refresh().await,
    };

    match result {
      Ok(()) => self.state.modify(|s| s.last_error = None),
      Err(e) => {
        error!(?command, "command failed: {:#}", e);
        self.state.modify(|s| s.last_error = Some(format!("{:#}", e)));
      }
    }
  }

  /// The list to render right now
  pub fn transactions(&self) -> Vec<Transaction> {
    self.view().snapshot().transactions
  }

  /// Writable handle on the dashboard state, for marking approvals pending
  /// as soon as they are queued
  pub(crate) fn state_cell(&self) -> Arc<Shared<DashboardState>> {
    Arc::clone(&self.state)
  }

  /// Read-only view for consumers
  pub fn view(&self) -> DashboardView {
    DashboardView {
      employees: self.employees.subscribe(),
      paginated: self.paginated.subscribe(),
      by_employee: self.by_employee.subscribe(),
      state: self.state.subscribe(),
    }
  }
}

/// Read-only access to dashboard and store state.
#[derive(Clone)]
pub struct DashboardView {
  employees: watch::Receiver<StoreState<Vec<Employee>>>,
  paginated: watch::Receiver<StoreState<TransactionPage>>,
  by_employee: watch::Receiver<StoreState<Vec<Transaction>>>,
  state: watch::Receiver<DashboardState>,
}

impl DashboardView {
  pub fn snapshot(&self) -> Snapshot {
    let employees = self.employees.borrow();
    let paginated = self.paginated.borrow();
    let by_employee = self.by_employee.borrow();
    let state = self.state.borrow();

    let transactions = derive_transactions(
      paginated.data.as_ref(),
      by_employee.data.as_deref(),
      &state.overrides,
    );

    let has_next_page = paginated
      .data
      .as_ref()
      .is_some_and(|page| page.next_page.is_some());

    Snapshot {
      can_view_more: state.filter == Filter::Unfiltered
        && !transactions.is_empty()
        && has_next_page,
      transactions,
      employees: employees.data.clone(),
      employees_loading: employees.loading,
      paginated_loading: paginated.loading,
      transactions_loading: paginated.loading || by_employee.loading,
      loading: state.loading,
      filter: state.filter.clone(),
      overrides: state.overrides.clone(),
      pending_approvals: state.pending_approvals.clone(),
      last_error: state.last_error.clone(),
    }
  }
}

/// Everything the UI needs for one frame
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
  pub employees: Option<Vec<Employee>>,
  pub employees_loading: bool,
  /// Authoritative transactions with overrides applied
  pub transactions: Vec<Transaction>,
  pub paginated_loading: bool,
  pub transactions_loading: bool,
  pub loading: bool,
  pub filter: Filter,
  pub overrides: HashMap<String, bool>,
  /// Approvals sent and not yet confirmed or rejected
  pub pending_approvals: HashSet<String>,
  /// Whether another page of all transactions can be appended
  pub can_view_more: bool,
  pub last_error: Option<String>,
}

/// Fires the initial full load exactly once: on the first render that finds
/// no employees and nothing loading.
#[derive(Debug, Default)]
pub struct InitialLoadGate {
  requested: bool,
}

impl InitialLoadGate {
  pub fn should_load(&mut self, employees: Option<&[Employee]>, employees_loading: bool) -> bool {
    if self.requested || employees.is_some() || employees_loading {
      return false;
    }
    self.requested = true;
    true
  }
}
