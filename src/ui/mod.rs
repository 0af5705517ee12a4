mod components;
mod renderfns;
pub mod view;
mod views;

pub use views::TransactionsView;

use crate::app::App;
use crate::dashboard::Snapshot;
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use renderfns::{draw_footer, draw_header, filter_label};
use view::View;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App, snapshot: &Snapshot) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  let filter = filter_label(&snapshot.filter, snapshot.employees.as_deref());
  draw_header(frame, chunks[0], app.config().title(), app.source(), &filter);

  let view = app.view_mut();
  view.render(frame, chunks[1], snapshot);
  let shortcuts = view.shortcuts(snapshot);

  draw_footer(frame, chunks[2], &shortcuts, snapshot.last_error.as_deref());
}

/// Keep the list selection inside the list, selecting the first row once
/// rows exist
pub fn ensure_valid_selection(list_state: &mut ListState, len: usize) {
  if len == 0 {
    list_state.select(None);
    return;
  }

  match list_state.selected() {
    Some(idx) if idx >= len => list_state.select(Some(len - 1)),
    None => list_state.select(Some(0)),
    _ => {}
  }
}
