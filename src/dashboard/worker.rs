use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::store::Shared;

use super::{Command, Dashboard, DashboardState, DashboardView};

/// Handle held by the UI: send commands, read snapshots.
#[derive(Clone)]
pub struct DashboardHandle {
  tx: mpsc::UnboundedSender<Command>,
  view: DashboardView,
  state: Arc<Shared<DashboardState>>,
}

impl DashboardHandle {
  /// Queue a command. An approval is marked pending right away, and a second
  /// approval for a transaction that is still pending is dropped.
  pub fn send(&self, command: Command) {
    if let Command::SetApproval(change) = &command {
      let mut queued = false;
      self.state.modify(|s| {
        queued = s.pending_approvals.insert(change.transaction_id.clone());
      });
      if !queued {
        debug!(transaction_id = %change.transaction_id, "approval already pending, dropped");
        return;
      }
    }

    debug!(?command, "command queued");
    if let Err(mpsc::error::SendError(command)) = self.tx.send(command) {
      warn!("dashboard worker stopped, command dropped");
      if let Command::SetApproval(change) = command {
        self.state.modify(|s| {
          s.pending_approvals.remove(&change.transaction_id);
        });
      }
    }
  }

  pub fn view(&self) -> &DashboardView {
    &self.view
  }
}

/// Move the dashboard into a worker task that runs commands one at a time.
///
/// Each command runs to completion before the next starts, so a response
/// fetched under an old filter is always written before the command that
/// replaces that filter invalidates it.
pub fn spawn(dashboard: Dashboard) -> DashboardHandle {
  let (tx, mut rx) = mpsc::unbounded_channel();
  let view = dashboard.view();
  let state = dashboard.state_cell();

  tokio::spawn(async move {
    while let Some(command) = rx.recv().await {
      dashboard.execute(command).await;
      debug!(rendered = dashboard.transactions().len(), "command finished");
    }
  });

  DashboardHandle { tx, view, state }
}
