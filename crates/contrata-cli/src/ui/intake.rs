//! Candidate intake form.

use contrata_core::intake::IntakeField;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let title = if app.intake.is_submitting() {
    " Registrar postulado (enviando…) "
  } else {
    " Registrar postulado "
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let focused = app.intake_field();
  let mut lines = Vec::new();
  for field in IntakeField::all() {
    let is_focused = field == focused;
    let marker = if field.required() { "*" } else { " " };
    let label_style = if is_focused {
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    let cursor = if is_focused { "_" } else { "" };

    lines.push(Line::from(vec![
      Span::styled(format!(" {marker} {:<34}", field.label()), label_style),
      Span::raw(format!("{}{cursor}", app.intake_fields.get(field))),
    ]));
  }
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    "   * obligatorio",
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(Paragraph::new(lines), inner);
}
