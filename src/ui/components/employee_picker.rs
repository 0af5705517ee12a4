use super::KeyResult;
use crate::api::types::Employee;
use crate::dashboard::Filter;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Events emitted by the employee picker that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeePickerEvent {
  /// Employee chosen; the "All Employees" entry has an empty id
  Selected(Employee),
  /// Picker cancelled
  Cancelled,
}

/// Overlay for choosing the employee filter
#[derive(Debug, Clone, Default)]
pub struct EmployeePicker {
  active: bool,
  items: Vec<Employee>,
  selected: usize,
}

impl EmployeePicker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Check if picker is currently active
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Show the picker with "All Employees" followed by the given employees,
  /// preselecting the active filter
  pub fn show(&mut self, employees: &[Employee], current: &Filter) {
    self.items = std::iter::once(Employee::all())
      .chain(employees.iter().cloned())
      .collect();

    self.selected = match current {
      Filter::Unfiltered => 0,
      Filter::Employee(id) => self.items.iter().position(|e| &e.id == id).unwrap_or(0),
    };
    self.active = true;
  }

  /// Hide the picker
  pub fn hide(&mut self) {
    self.active = false;
    self.items.clear();
    self.selected = 0;
  }

  /// Handle a key event
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<EmployeePickerEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(EmployeePickerEvent::Cancelled)
      }
      KeyCode::Enter => {
        let event = match self.items.get(self.selected) {
          Some(employee) => EmployeePickerEvent::Selected(employee.clone()),
          None => EmployeePickerEvent::Cancelled,
        };
        self.hide();
        KeyResult::Event(event)
      }
      KeyCode::Char('j') | KeyCode::Down => {
        if !self.items.is_empty() {
          self.selected = (self.selected + 1) % self.items.len();
        }
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        if !self.items.is_empty() {
          self.selected = if self.selected == 0 {
            self.items.len() - 1
          } else {
            self.selected - 1
          };
        }
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  /// Render the picker overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let (width, height) = overlay_size(&self.items, area);

    // Center the overlay
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Filter by employee ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let items: Vec<ListItem> = self
      .items
      .iter()
      .map(|employee| {
        let style = if employee.id.is_empty() {
          Style::default().fg(Color::Yellow)
        } else {
          Style::default().fg(Color::Cyan)
        };
        ListItem::new(Line::from(Span::styled(employee.full_name(), style)))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}

/// Overlay size that fits the longest name and every entry, clamped to the area
fn overlay_size(items: &[Employee], area: Rect) -> (u16, u16) {
  let max_name_len = items
    .iter()
    .map(|e| e.full_name().chars().count())
    .max()
    .unwrap_or(10);

  let width = clamp_u16(max_name_len)
    .saturating_add(6)
    .max(24)
    .min(area.width.saturating_sub(4));
  let height = clamp_u16(items.len())
    .saturating_add(2)
    .max(3)
    .min(area.height.saturating_sub(4));

  (width, height)
}

fn clamp_u16(n: usize) -> u16 {
  u16::try_from(n).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn employees() -> Vec<Employee> {
    vec![
      Employee {
        id: "e1".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
      },
      Employee {
        id: "e2".to_string(),
        first_name: "Alan".to_string(),
        last_name: "Turing".to_string(),
      },
    ]
  }

  #[test]
  fn test_inactive_picker_ignores_keys() {
    let mut picker = EmployeePicker::new();
    assert_eq!(picker.handle_key(key(KeyCode::Enter)), KeyResult::NotHandled);
  }

  #[test]
  fn test_first_entry_clears_filter() {
    let mut picker = EmployeePicker::new();
    picker.show(&employees(), &Filter::Unfiltered);

    match picker.handle_key(key(KeyCode::Enter)) {
      KeyResult::Event(EmployeePickerEvent::Selected(employee)) => {
        assert_eq!(employee, Employee::all());
      }
      other => panic!("unexpected result: {:?}", other),
    }
    assert!(!picker.is_active());
  }

  #[test]
  fn test_navigate_and_select() {
    let mut picker = EmployeePicker::new();
    picker.show(&employees(), &Filter::Unfiltered);

    picker.handle_key(key(KeyCode::Char('j')));
    picker.handle_key(key(KeyCode::Char('j')));
    let result = picker.handle_key(key(KeyCode::Enter));

    assert_eq!(
      result,
      KeyResult::Event(EmployeePickerEvent::Selected(employees()[1].clone()))
    );
  }

  #[test]
  fn test_wraps_upwards() {
    let mut picker = EmployeePicker::new();
    picker.show(&employees(), &Filter::Unfiltered);

    picker.handle_key(key(KeyCode::Up));
    let result = picker.handle_key(key(KeyCode::Enter));
    assert_eq!(
      result,
      KeyResult::Event(EmployeePickerEvent::Selected(employees()[1].clone()))
    );
  }

  #[test]
  fn test_preselects_active_filter() {
    let mut picker = EmployeePicker::new();
    picker.show(&employees(), &Filter::Employee("e1".to_string()));

    let result = picker.handle_key(key(KeyCode::Enter));
    assert_eq!(
      result,
      KeyResult::Event(EmployeePickerEvent::Selected(employees()[0].clone()))
    );
  }

  #[test]
  fn test_overlay_size_with_huge_list() {
    let items: Vec<Employee> = (0..70_000)
      .map(|i| Employee {
        id: format!("e{}", i),
        first_name: "A".to_string(),
        last_name: "B".to_string(),
      })
      .collect();
    let area = Rect::new(0, 0, 80, 24);

    assert_eq!(overlay_size(&items, area), (24, 20));
  }

  #[test]
  fn test_overlay_width_counts_characters() {
    let items = vec![Employee {
      id: "e1".to_string(),
      first_name: "Zoë".to_string(),
      last_name: "Ångström-Müller-Sørensen".to_string(),
    }];
    let area = Rect::new(0, 0, 200, 50);

    // 28 characters plus padding, not the longer byte length
    assert_eq!(overlay_size(&items, area), (34, 3));
  }

  #[test]
  fn test_escape_cancels() {
    let mut picker = EmployeePicker::new();
    picker.show(&employees(), &Filter::Unfiltered);

    assert_eq!(
      picker.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(EmployeePickerEvent::Cancelled)
    );
    assert!(!picker.is_active());
  }
}
