use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with title, data source and active filter
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, source: &str, filter: &str) {
  let header = Line::from(vec![
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", extract_domain(source)),
      Style::default().fg(Color::White),
    ),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", filter),
      Style::default().fg(Color::Yellow).bold(),
    ),
  ]);

  let paragraph = Paragraph::new(header).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Host part of an API URL; other labels pass through
fn extract_domain(source: &str) -> &str {
  source
    .strip_prefix("https://")
    .or_else(|| source.strip_prefix("http://"))
    .map(|rest| rest.split('/').next().unwrap_or(rest))
    .unwrap_or(source)
}
