use crate::ui::view::ShortcutInfo;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer with the view's shortcuts, or the last error if there is one
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  shortcuts: &[ShortcutInfo],
  last_error: Option<&str>,
) {
  if let Some(error) = last_error {
    let line = Line::from(vec![
      Span::styled(" error: ", Style::default().fg(Color::Red).bold()),
      Span::styled(error.to_string(), Style::default().fg(Color::Red)),
    ]);
    frame.render_widget(
      Paragraph::new(line).style(Style::default().bg(Color::Black)),
      area,
    );
    return;
  }

  let mut sorted: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  sorted.sort_by_key(|s| s.priority);

  let mut spans = vec![Span::raw(" ")];
  for (i, shortcut) in sorted.iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("   "));
    }
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
