//! Demo candidate card.

use contrata_core::demo::JOB_POSITIONS;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(demo) = &app.demo else {
    return;
  };

  let area = super::centered(area, 60, 16);
  let block = Block::default()
    .title(" Candidatos al Empleo ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let label = |s: &str| Span::styled(format!("{s:<22}"), Style::default().fg(Color::DarkGray));
  let mut lines = Vec::new();

  match demo.current() {
    Some(c) => {
      lines.push(Line::from(Span::styled(
        c.full_name(),
        Style::default().add_modifier(Modifier::BOLD),
      )));
      lines.push(Line::from(""));
      lines.push(Line::from(vec![label("Edad"), Span::raw(c.profile.dob.age.to_string())]));
      lines.push(Line::from(vec![label("Género"), Span::raw(c.profile.gender.clone())]));
      lines.push(Line::from(vec![label("Nacionalidad"), Span::raw(c.nationality().to_owned())]));
      lines.push(Line::from(vec![
        label("Habilidad técnica"),
        Span::raw(c.skill_technical.to_string()),
      ]));
      lines.push(Line::from(vec![
        label("Habilidad social"),
        Span::raw(c.skill_social.to_string()),
      ]));
      lines.push(Line::from(vec![
        label("Recomendación"),
        Span::raw(c.recommendation.to_string()),
      ]));
    }
    None => lines.push(Line::from(Span::styled(
      "Cargando candidato…",
      Style::default().fg(Color::DarkGray),
    ))),
  }

  lines.push(Line::from(""));
  if demo.picker_open() {
    lines.push(Line::from(Span::styled(
      "Seleccione un puesto:",
      Style::default().add_modifier(Modifier::BOLD),
    )));
    for (i, job) in JOB_POSITIONS.iter().enumerate() {
      let style = if i == app.demo_cursor {
        Style::default().bg(Color::Blue).fg(Color::White)
      } else {
        Style::default()
      };
      lines.push(Line::from(Span::styled(format!("  {job}"), style)));
    }
  } else {
    lines.push(Line::from(vec![
      Span::styled("[d] Descartar", Style::default().fg(Color::Red)),
      Span::raw("   "),
      Span::styled("[a] Aprobar", Style::default().fg(Color::Green)),
    ]));
  }

  if let Some(msg) = demo.last_assignment() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(msg.to_owned(), Style::default().fg(Color::Green))));
  }
  if let Some(err) = demo.error() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(format!("Error: {err}"), Style::default().fg(Color::Red))));
  }

  f.render_widget(Paragraph::new(lines), inner);
}
