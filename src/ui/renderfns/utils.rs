use crate::api::types::Employee;
use crate::dashboard::Filter;
use ratatui::prelude::Color;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Format an amount as dollars with thousands separators
pub fn format_amount(amount: f64) -> String {
  let cents = (amount.abs() * 100.0).round() as u64;
  let whole = (cents / 100).to_string();

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, c) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }

  let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
  format!("{}${}.{:02}", sign, grouped, cents % 100)
}

pub fn approval_color(approved: bool) -> Color {
  if approved {
    Color::Green
  } else {
    Color::White
  }
}

/// Label for the active filter, using the employee's name once employees are known
pub fn filter_label(filter: &Filter, employees: Option<&[Employee]>) -> String {
  match filter {
    Filter::Unfiltered => Employee::all().full_name(),
    Filter::Employee(id) => employees
      .and_then(|list| list.iter().find(|e| &e.id == id))
      .map(Employee::full_name)
      .unwrap_or_else(|| id.clone()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Café Crème Brûlée", 8), "Café ...");
  }

  #[test]
  fn test_format_amount() {
    assert_eq!(format_amount(0.0), "$0.00");
    assert_eq!(format_amount(12.5), "$12.50");
    assert_eq!(format_amount(1234.56), "$1,234.56");
    assert_eq!(format_amount(1_000_000.0), "$1,000,000.00");
    assert_eq!(format_amount(-42.1), "-$42.10");
  }

  #[test]
  fn test_approval_color() {
    assert_eq!(approval_color(true), Color::Green);
    assert_eq!(approval_color(false), Color::White);
  }

  #[test]
  fn test_filter_label() {
    let employees = vec![Employee {
      id: "emp_1".to_string(),
      first_name: "Ada".to_string(),
      last_name: "Lovelace".to_string(),
    }];

    assert_eq!(filter_label(&Filter::Unfiltered, None), "All Employees");
    assert_eq!(
      filter_label(&Filter::Employee("emp_1".to_string()), Some(&employees)),
      "Ada Lovelace"
    );
    assert_eq!(
      filter_label(&Filter::Employee("emp_9".to_string()), Some(&employees)),
      "emp_9"
    );
  }
}
