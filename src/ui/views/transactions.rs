use crate::api::types::{ApprovalChange, Transaction};
use crate::dashboard::{Command, InitialLoadGate, Snapshot};
use crate::ui::components::{EmployeePicker, EmployeePickerEvent, KeyResult};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{approval_color, filter_label, format_amount, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Transaction list with approval toggles, employee filter and pagination
pub struct TransactionsView {
  list_state: ListState,
  picker: EmployeePicker,
  initial_load: InitialLoadGate,
}

impl TransactionsView {
  pub fn new() -> Self {
    Self {
      list_state: ListState::default(),
      picker: EmployeePicker::new(),
      initial_load: InitialLoadGate::default(),
    }
  }

  fn selected<'a>(&self, snapshot: &'a Snapshot) -> Option<&'a Transaction> {
    self
      .list_state
      .selected()
      .and_then(|idx| snapshot.transactions.get(idx))
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let len = snapshot.transactions.len();
    ensure_valid_selection(&mut self.list_state, len);

    let label = filter_label(&snapshot.filter, snapshot.employees.as_deref());
    let busy = snapshot.loading || snapshot.transactions_loading;
    let title = if busy {
      format!(" Transactions [{}] (loading...) ", label)
    } else {
      format!(" Transactions [{}] ({}) ", label, len)
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if snapshot.transactions.is_empty() {
      let content = if busy || snapshot.employees.is_none() {
        "Loading transactions..."
      } else if snapshot.last_error.is_some() {
        "Failed to load transactions. Press 'r' to retry."
      } else {
        "No transactions found."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = snapshot
      .transactions
      .iter()
      .map(|txn| {
        let (mark, mark_style) = if snapshot.pending_approvals.contains(&txn.id) {
          ("[~]", Style::default().fg(Color::Yellow))
        } else if txn.approved {
          ("[x]", Style::default().fg(approval_color(true)))
        } else {
          ("[ ]", Style::default().fg(approval_color(false)))
        };

        let line = Line::from(vec![
          Span::styled(mark, mark_style),
          Span::raw(" "),
          Span::styled(
            format!("{:<10}", truncate(&txn.date, 10)),
            Style::default().fg(Color::DarkGray),
          ),
          Span::raw(" "),
          Span::styled(
            format!("{:<24}", truncate(&txn.merchant, 24)),
            Style::default().fg(Color::White),
          ),
          Span::raw(" "),
          Span::styled(
            format!("{:<20}", truncate(&txn.employee.full_name(), 20)),
            Style::default().fg(Color::Cyan),
          ),
          Span::raw(" "),
          Span::styled(
            format!("{:>14}", format_amount(txn.amount)),
            Style::default().fg(Color::Yellow),
          ),
        ]);
        ListItem::new(line)
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_view_more(&self, frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let line = if snapshot.paginated_loading {
      Line::from(Span::styled(
        " Loading more...",
        Style::default().fg(Color::DarkGray),
      ))
    } else {
      Line::from(vec![
        Span::styled(" <m>", Style::default().fg(Color::Cyan)),
        Span::styled(" view more", Style::default().fg(Color::DarkGray)),
      ])
    };
    frame.render_widget(Paragraph::new(line), area);
  }
}

impl View for TransactionsView {
  fn handle_key(&mut self, key: KeyEvent, snapshot: &Snapshot) -> ViewAction {
    // The picker overlay gets first chance at the key
    match self.picker.handle_key(key) {
      KeyResult::Handled => return ViewAction::None,
      KeyResult::Event(EmployeePickerEvent::Selected(employee)) => {
        self.list_state.select(None);
        return ViewAction::Dispatch(Command::LoadByEmployee(employee.id));
      }
      KeyResult::Event(EmployeePickerEvent::Cancelled) => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
      }
      KeyCode::Char(' ') | KeyCode::Enter => {
        if let Some(txn) = self.selected(snapshot) {
          if snapshot.pending_approvals.contains(&txn.id) {
            return ViewAction::None;
          }
          // Toggle what is on screen, which already includes local overrides
          return ViewAction::Dispatch(Command::SetApproval(ApprovalChange {
            transaction_id: txn.id.clone(),
            new_value: !txn.approved,
          }));
        }
      }
      KeyCode::Char('f') => {
        if let Some(employees) = snapshot.employees.as_deref() {
          self.picker.show(employees, &snapshot.filter);
        }
      }
      KeyCode::Char('m') => {
        if snapshot.can_view_more && !snapshot.paginated_loading {
          return ViewAction::Dispatch(Command::LoadAll);
        }
      }
      KeyCode::Char('r') => return ViewAction::Dispatch(Command::Refresh),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Quit,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    if snapshot.can_view_more {
      let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
      self.render_list(frame, chunks[0], snapshot);
      self.render_view_more(frame, chunks[1], snapshot);
    } else {
      self.render_list(frame, area, snapshot);
    }

    self.picker.render_overlay(frame, area);
  }

  fn tick(&mut self, snapshot: &Snapshot) -> ViewAction {
    if self
      .initial_load
      .should_load(snapshot.employees.as_deref(), snapshot.employees_loading)
    {
      return ViewAction::Dispatch(Command::LoadAll);
    }
    ViewAction::None
  }

  fn shortcuts(&self, snapshot: &Snapshot) -> Vec<ShortcutInfo> {
    if self.picker.is_active() {
      return vec![
        ShortcutInfo::new("j/k", "move").with_priority(10),
        ShortcutInfo::new("enter", "select").with_priority(20),
        ShortcutInfo::new("esc", "cancel").with_priority(30),
      ];
    }

    let mut shortcuts = vec![
      ShortcutInfo::new("j/k", "move").with_priority(10),
      ShortcutInfo::new("space", "approve").with_priority(20),
      ShortcutInfo::new("r", "refresh").with_priority(60),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ];
    if snapshot.employees.is_some() {
      shortcuts.push(ShortcutInfo::new("f", "filter").with_priority(30));
    }
    if snapshot.can_view_more {
      shortcuts.push(ShortcutInfo::new("m", "view more").with_priority(40));
    }
    shortcuts
  }
}
