//! Login form, centred in the body.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, LoginField};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let area = super::centered(area, 50, 8);
  let block = Block::default()
    .title(" Iniciar sesión ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let masked = "•".repeat(app.login.password.chars().count());
  let lines = vec![
    Line::from(""),
    field_line("Correo     ", &app.login.email, app.login.focus == LoginField::Email),
    Line::from(""),
    field_line("Contraseña ", &masked, app.login.focus == LoginField::Password),
  ];
  f.render_widget(Paragraph::new(lines), inner);
}

fn field_line<'a>(label: &'a str, value: &str, focused: bool) -> Line<'a> {
  let value_style = if focused {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  let cursor = if focused { "_" } else { "" };
  Line::from(vec![
    Span::styled(format!(" {label}"), Style::default().fg(Color::DarkGray)),
    Span::styled(format!("{value}{cursor}"), value_style),
  ])
}
