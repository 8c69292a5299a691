//! Review screen: listing on the left, profile on the right.

use chrono::Utc;
use contrata_core::{
  candidate::{CandidateRecord, Department},
  review::{Profile, ReviewView},
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::App;

// ─── Public entry ────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(area);

  draw_listing(f, cols[0], app);
  match app.review.profile() {
    Some(profile) => draw_profile(f, cols[1], app, profile),
    None => draw_empty_profile(f, cols[1]),
  }
}

// ─── Listing ─────────────────────────────────────────────────────────────────

fn listing_title(app: &App) -> String {
  let view = match app.review.view() {
    ReviewView::ActivePool => "Postulados".to_string(),
    ReviewView::Departments(Some(d)) => format!("Departamento {d}"),
    ReviewView::Departments(None) => "Departamentos".to_string(),
  };
  let loading = if app.review.is_loading() { " …" } else { "" };
  format!(" {view}  pág. {}{loading} ", app.review.page_number())
}

fn draw_listing(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(listing_title(app))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(1)])
    .split(inner);

  if app.review.view() == ReviewView::Departments(None) {
    draw_department_chooser(f, rows[0]);
  } else {
    draw_records(f, rows[0], app);
  }
  draw_pager(f, rows[1], app);
}

fn draw_department_chooser(f: &mut Frame, area: Rect) {
  let mut lines = vec![Line::from(Span::styled(
    "Elija un departamento:",
    Style::default().fg(Color::DarkGray),
  ))];
  for (i, d) in Department::all().into_iter().enumerate() {
    lines.push(Line::from(format!("  [{}] {d}", i + 1)));
  }
  f.render_widget(Paragraph::new(lines), area);
}

fn draw_records(f: &mut Frame, area: Rect, app: &App) {
  let records = &app.review.page().records;
  if records.is_empty() {
    let msg = if app.review.is_loading() { "Cargando…" } else { "Sin postulados." };
    f.render_widget(
      Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
      area,
    );
    return;
  }

  let now = Utc::now();
  let items: Vec<ListItem> = records
    .iter()
    .map(|r| ListItem::new(Line::from(r.summary(now))))
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.review_cursor.min(records.len() - 1)));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    area,
    &mut state,
  );
}

fn draw_pager(f: &mut Frame, area: Rect, app: &App) {
  let enabled = Style::default().fg(Color::Cyan);
  let disabled = Style::default().fg(Color::DarkGray);
  let line = Line::from(vec![
    Span::styled(
      "◀ p anterior",
      if app.review.can_go_back() { enabled } else { disabled },
    ),
    Span::raw("   "),
    Span::styled(
      "n siguiente ▶",
      if app.review.can_go_forward() { enabled } else { disabled },
    ),
  ]);
  f.render_widget(Paragraph::new(line), area);
}

// ─── Profile ─────────────────────────────────────────────────────────────────

fn draw_empty_profile(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Perfil ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new("Seleccione un postulado y presione Enter.")
      .style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

/// Candidate photos are not stored; the profile reserves their slot.
const PHOTO_PLACEHOLDER: &str = "[ sin foto ]";

fn detail_lines(record: &CandidateRecord) -> Vec<Line<'static>> {
  let birth = record
    .birth_date
    .map(|d| d.format("%d/%m/%Y").to_string())
    .unwrap_or_default();
  let rows = [
    ("Foto", PHOTO_PLACEHOLDER.to_owned()),
    ("Nombre", record.full_name()),
    ("Edad", record.age(Utc::now())),
    ("Nacimiento", birth),
    ("Experiencia", record.experience.clone().unwrap_or_default()),
    ("Estudios", record.education.clone().unwrap_or_default()),
    ("Idiomas", record.languages.clone().unwrap_or_default()),
    ("Teléfono", record.phone.clone().unwrap_or_default()),
    ("Notas", record.notes.clone().unwrap_or_default()),
    ("Estado", record.status.to_string()),
  ];
  rows
    .into_iter()
    .map(|(label, value)| {
      Line::from(vec![
        Span::styled(format!("{label:<12} "), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
      ])
    })
    .collect()
}

fn draw_profile(f: &mut Frame, area: Rect, app: &App, profile: &Profile) {
  let block = Block::default()
    .title(format!(" {} ", profile.record.full_name()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = detail_lines(&profile.record);
  lines.push(Line::from(""));

  if !profile.actions_available() {
    lines.push(Line::from(Span::styled(
      "Solo lectura: este postulado ya fue decidido.",
      Style::default().fg(Color::DarkGray),
    )));
  } else if profile.hire_picker {
    lines.push(Line::from(Span::styled(
      "Contratar en:",
      Style::default().add_modifier(Modifier::BOLD),
    )));
    for (i, d) in Department::all().into_iter().enumerate() {
      let style = if i == app.dept_cursor {
        Style::default().bg(Color::Blue).fg(Color::White)
      } else {
        Style::default()
      };
      lines.push(Line::from(Span::styled(format!("  {d}"), style)));
    }
  } else {
    lines.push(Line::from(vec![
      Span::styled("[d] Eliminar", Style::default().fg(Color::Red)),
      Span::raw("   "),
      Span::styled("[c] Contratar", Style::default().fg(Color::Green)),
    ]));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use contrata_core::candidate::NewCandidate;
  use uuid::Uuid;

  use super::*;

  fn text(line: &Line<'_>) -> String { line.spans.iter().map(|s| s.content.as_ref()).collect() }

  #[test]
  fn profile_reserves_a_photo_slot() {
    let record = NewCandidate {
      paternal_surname: "Rojas".into(),
      maternal_surname: "Vera".into(),
      given_names:      "Inés".into(),
      birth_date:       NaiveDate::from_ymd_opt(1990, 1, 1),
      experience:       "3 años".into(),
      education:        "Ingeniería".into(),
      languages:        "Español".into(),
      notes:            None,
      phone:            None,
    }
    .into_record(Uuid::new_v4(), Utc::now());

    let lines: Vec<String> = detail_lines(&record).iter().map(text).collect();
    assert!(lines[0].starts_with("Foto"));
    assert!(lines[0].ends_with(PHOTO_PLACEHOLDER));
    assert!(lines.iter().any(|l| l.contains("Inés")));
  }
}
