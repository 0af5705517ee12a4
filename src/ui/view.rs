use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use crate::dashboard::{Command, Snapshot};

/// A keyboard shortcut hint for display in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Actions that a view can request in response to user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
  /// No action needed
  None,
  /// Hand a command to the dashboard worker
  Dispatch(Command),
  /// Leave the application
  Quit,
}

/// Trait for view behavior
///
/// Views never talk to the dashboard directly: they read the frame's
/// snapshot and return actions for the App to execute.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent, snapshot: &Snapshot) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect, snapshot: &Snapshot);

  /// Called once per frame before rendering
  fn tick(&mut self, _snapshot: &Snapshot) -> ViewAction {
    ViewAction::None
  }

  /// Get keyboard shortcuts to display in the footer
  fn shortcuts(&self, _snapshot: &Snapshot) -> Vec<ShortcutInfo> {
    vec![ShortcutInfo::new("q", "quit").with_priority(90)]
  }
}
