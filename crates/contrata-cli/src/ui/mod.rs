//! TUI rendering; orchestrates all panes.

pub mod demo;
pub mod intake;
pub mod login;
pub mod review;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};

// ─── Root draw ───────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.screen() {
    Screen::Login => login::draw(f, rows[1], app),
    Screen::Intake => intake::draw(f, rows[1], app),
    Screen::Review => review::draw(f, rows[1], app),
    Screen::Demo => demo::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

/// A `width` × `height` rectangle centred in `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width)])
    .flex(Flex::Center)
    .areas(row);
  cell
}

// ─── Header ──────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%d/%m/%Y").to_string();

  let title = match app.shell.session() {
    Some(s) => format!(" contrata  {} ({})", s.username, s.role),
    None if app.screen() == Screen::Demo => " contrata  candidatos al empleo (demo)".to_string(),
    None => " contrata".to_string(),
  };
  let left = Span::styled(
    title,
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::DarkGray));

  // Simple left-right header: pad the middle.
  let left_width = left.width() as u16;
  let right_width = right.width() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ──────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen() {
    Screen::Login => ("LOGIN", "Tab cambiar campo  Enter ingresar  Esc salir"),
    Screen::Intake => (
      "POSTULACIÓN",
      "Tab/↑↓ campo  Enter siguiente  Ctrl-S registrar  Ctrl-L cerrar sesión  Esc salir",
    ),
    Screen::Review => match app.review.profile() {
      Some(p) if p.hire_picker => ("CONTRATAR", "↑↓ departamento  Enter confirmar  Esc volver"),
      Some(p) if p.actions_available() => ("PERFIL", "d eliminar  c contratar  Esc volver"),
      Some(_) => ("PERFIL", "Esc volver"),
      None => (
        "REVISIÓN",
        "↑↓ mover  Enter perfil  n/p página  a postulados  v departamentos  1-2 depto  Ctrl-L salir",
      ),
    },
    Screen::Demo => ("DEMO", "d descartar  a aprobar  x limpiar  q salir"),
  };

  let review_error = (app.screen() == Screen::Review)
    .then(|| app.review.error())
    .flatten();
  let (status, style) = match review_error {
    Some(err) => (format!("Error: {err}  (Esc para cerrar)"), Style::default().fg(Color::Red)),
    None if !app.status_msg.is_empty() => (app.status_msg.clone(), Style::default().fg(Color::Yellow)),
    None => (hints.to_string(), Style::default().fg(Color::DarkGray)),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), style);

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
