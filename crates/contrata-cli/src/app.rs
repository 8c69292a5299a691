//! Application state machine and event dispatcher.

use std::sync::Arc;

use contrata_core::{
  candidate::Department,
  demo::{DemoScreen, JOB_POSITIONS},
  intake::{Intake, IntakeField, IntakeFields, SubmitOutcome},
  review::{PageConfig, ReviewView, ReviewWorkflow},
  session::{Shell, Surface, login},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand_core::OsRng;

use crate::client::{ApiClient, RandomUserClient};

// ─── Login form ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
  #[default]
  Email,
  Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
  pub email:    String,
  pub password: String,
  pub focus:    LoginField,
}

impl LoginForm {
  fn toggle(&mut self) {
    self.focus = match self.focus {
      LoginField::Email => LoginField::Password,
      LoginField::Password => LoginField::Email,
    };
  }

  fn input(&mut self) -> &mut String {
    match self.focus {
      LoginField::Email => &mut self.email,
      LoginField::Password => &mut self.password,
    }
  }
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// What the terminal is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Login,
  Intake,
  Review,
  Demo,
}

// ─── App ─────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Session context; decides which workflow is on screen.
  pub shell: Shell,

  pub login: LoginForm,

  pub intake_fields: IntakeFields,
  pub intake:        Intake,
  /// Index into [`IntakeField::all`] of the focused field.
  pub intake_focus:  usize,

  pub review:        ReviewWorkflow,
  /// Cursor within the visible page.
  pub review_cursor: usize,
  /// Cursor within the hire picker.
  pub dept_cursor:   usize,

  /// Present only when started in demo mode.
  pub demo:        Option<DemoScreen>,
  pub demo_cursor: usize,

  /// One-line message shown in the status bar until the next action.
  pub status_msg: String,

  pub client:   Arc<ApiClient>,
  pub profiles: Arc<RandomUserClient>,
}

impl App {
  pub fn new(client: ApiClient, profiles: RandomUserClient, demo: bool) -> Self {
    Self {
      shell: Shell::new(),
      login: LoginForm::default(),
      intake_fields: IntakeFields::default(),
      intake: Intake::new(),
      intake_focus: 0,
      review: ReviewWorkflow::new(PageConfig::default()),
      review_cursor: 0,
      dept_cursor: 0,
      demo: demo.then(DemoScreen::new),
      demo_cursor: 0,
      status_msg: String::new(),
      client: Arc::new(client),
      profiles: Arc::new(profiles),
    }
  }

  pub fn screen(&self) -> Screen {
    if self.demo.is_some() {
      return Screen::Demo;
    }
    match self.shell.surface() {
      Surface::Login => Screen::Login,
      Surface::Intake => Screen::Intake,
      Surface::Review => Screen::Review,
    }
  }

  pub fn intake_field(&self) -> IntakeField {
    IntakeField::all()[self.intake_focus.min(IntakeField::all().len() - 1)]
  }

  /// Fetch the first demo profile.
  pub async fn start_demo(&mut self) {
    let profiles = Arc::clone(&self.profiles);
    if let Some(demo) = &mut self.demo {
      demo.advance(&*profiles, &mut OsRng).await;
    }
  }

  // ── Key handling ─────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    let screen = self.screen();

    // Global: Ctrl-L signs out of any workflow.
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('l')
      && matches!(screen, Screen::Intake | Screen::Review)
    {
      self.sign_out().await;
      return Ok(true);
    }

    match screen {
      Screen::Login => self.handle_login_key(key).await,
      Screen::Intake => self.handle_intake_key(key).await,
      Screen::Review => self.handle_review_key(key).await,
      Screen::Demo => self.handle_demo_key(key).await,
    }
  }

  // ── Login ────────────────────────────────────────────────────────────────

  async fn handle_login_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => return Ok(false),
      KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.login.toggle(),
      KeyCode::Backspace => {
        self.login.input().pop();
      }
      KeyCode::Char(c) => self.login.input().push(c),
      KeyCode::Enter => self.submit_login().await,
      _ => {}
    }
    Ok(true)
  }

  async fn submit_login(&mut self) {
    self.status_msg = "Ingresando…".into();
    let result = login(&*self.client, &self.login.email, &self.login.password).await;
    match result {
      Ok(session) => {
        self.login = LoginForm::default();
        self.status_msg = format!("Sesión iniciada como {}", session.username);
        if self.shell.establish(session) == Surface::Review {
          self.enter_review().await;
        }
      }
      Err(e) => {
        self.login.password.clear();
        self.status_msg = e.to_string();
      }
    }
  }

  async fn enter_review(&mut self) {
    let config = match self.client.review_config().await {
      Ok(c) => c,
      Err(e) => {
        tracing::warn!(error = %e, "using default review config");
        PageConfig::default()
      }
    };
    self.review = ReviewWorkflow::new(config);
    self.review_cursor = 0;
    let client = Arc::clone(&self.client);
    self.review.show_active_pool(&*client).await;
  }

  async fn sign_out(&mut self) {
    if let Err(e) = self.client.sign_out().await {
      tracing::warn!(error = %e, "sign-out request failed");
    }
    if let Some(session) = self.shell.sign_out() {
      tracing::info!(user_id = %session.user_id, "signed out");
    }
    self.intake_fields.clear();
    self.intake_focus = 0;
    self.review = ReviewWorkflow::new(PageConfig::default());
    self.status_msg = "Sesión cerrada".into();
  }

  // ── Intake ───────────────────────────────────────────────────────────────

  async fn handle_intake_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let last = IntakeField::all().len() - 1;
    let submit_chord =
      key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s');

    match key.code {
      _ if submit_chord => self.submit_intake().await,
      KeyCode::Esc => return Ok(false),
      KeyCode::Tab | KeyCode::Down => self.intake_focus = (self.intake_focus + 1).min(last),
      KeyCode::BackTab | KeyCode::Up => self.intake_focus = self.intake_focus.saturating_sub(1),
      KeyCode::Enter if self.intake_focus == last => self.submit_intake().await,
      KeyCode::Enter => self.intake_focus += 1,
      KeyCode::Backspace => {
        let field = self.intake_field();
        self.intake_fields.get_mut(field).pop();
      }
      KeyCode::Char(c) => {
        let field = self.intake_field();
        self.intake_fields.get_mut(field).push(c);
      }
      _ => {}
    }
    Ok(true)
  }

  async fn submit_intake(&mut self) {
    let client = Arc::clone(&self.client);
    match self.intake.submit(&*client, &mut self.intake_fields).await {
      Ok(SubmitOutcome::Submitted(record)) => {
        self.intake_focus = 0;
        self.status_msg = format!("Postulado registrado: {}", record.full_name());
      }
      Ok(SubmitOutcome::Ignored) => {}
      Err(e) => self.status_msg = e.to_string(),
    }
  }

  // ── Review ───────────────────────────────────────────────────────────────

  async fn handle_review_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let client = Arc::clone(&self.client);
    let store = &*client;

    // Hire picker over an open profile.
    if self.review.profile().is_some_and(|p| p.hire_picker) {
      let departments = Department::all();
      match key.code {
        KeyCode::Esc => self.review.close_hire_picker(),
        KeyCode::Down | KeyCode::Char('j') => {
          self.dept_cursor = (self.dept_cursor + 1).min(departments.len() - 1);
        }
        KeyCode::Up | KeyCode::Char('k') => self.dept_cursor = self.dept_cursor.saturating_sub(1),
        KeyCode::Enter => {
          if let Some(&department) = departments.get(self.dept_cursor) {
            match self.review.hire(store, department).await {
              Ok(status) => {
                self.review_cursor = 0;
                self.status_msg = format!("Contratado en {status}");
              }
              Err(e) => self.status_msg = e.to_string(),
            }
          }
        }
        _ => {}
      }
      return Ok(true);
    }

    // Open profile.
    if self.review.profile().is_some() {
      match key.code {
        KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => self.review.close_profile(),
        KeyCode::Char('d') => match self.review.discard(store).await {
          Ok(_) => {
            self.review_cursor = 0;
            self.status_msg = "Postulado eliminado".into();
          }
          Err(e) => self.status_msg = e.to_string(),
        },
        KeyCode::Char('c') => {
          if self.review.open_hire_picker() {
            self.dept_cursor = 0;
          } else {
            self.status_msg = "Este perfil es de solo lectura".into();
          }
        }
        KeyCode::Char('q') => return Ok(false),
        _ => {}
      }
      return Ok(true);
    }

    // Listing.
    let len = self.review.page().records.len();
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Esc => {
        self.review.dismiss_error();
        self.status_msg.clear();
      }
      KeyCode::Down | KeyCode::Char('j') => {
        if self.review_cursor + 1 < len {
          self.review_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => self.review_cursor = self.review_cursor.saturating_sub(1),
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        self.review.open_profile(self.review_cursor);
      }
      KeyCode::Char('n') | KeyCode::PageDown => {
        if self.review.next_page(store).await {
          self.review_cursor = 0;
        }
      }
      KeyCode::Char('p') | KeyCode::PageUp => {
        if self.review.previous_page(store).await {
          self.review_cursor = 0;
        }
      }
      KeyCode::Char('a') => {
        self.review_cursor = 0;
        self.review.show_active_pool(store).await;
      }
      KeyCode::Char('v') => {
        self.review_cursor = 0;
        self.review.show_departments();
      }
      KeyCode::Char('r') => {
        self.review_cursor = 0;
        match self.review.view() {
          ReviewView::ActivePool => self.review.show_active_pool(store).await,
          ReviewView::Departments(Some(d)) => self.review.select_department(store, d).await,
          ReviewView::Departments(None) => {}
        }
      }
      KeyCode::Char(c @ '1'..='9') if matches!(self.review.view(), ReviewView::Departments(_)) => {
        let index = c as usize - '1' as usize;
        if let Some(&department) = Department::all().get(index) {
          self.review_cursor = 0;
          self.review.select_department(store, department).await;
        }
      }
      _ => {}
    }
    Ok(true)
  }

  // ── Demo ─────────────────────────────────────────────────────────────────

  async fn handle_demo_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let profiles = Arc::clone(&self.profiles);
    let Some(demo) = &mut self.demo else {
      return Ok(true);
    };

    if demo.picker_open() {
      match key.code {
        KeyCode::Esc => demo.close_picker(),
        KeyCode::Down | KeyCode::Char('j') => {
          self.demo_cursor = (self.demo_cursor + 1).min(JOB_POSITIONS.len() - 1);
        }
        KeyCode::Up | KeyCode::Char('k') => self.demo_cursor = self.demo_cursor.saturating_sub(1),
        KeyCode::Enter => {
          demo.approve(self.demo_cursor, &*profiles, &mut OsRng).await;
        }
        _ => {}
      }
      return Ok(true);
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
      KeyCode::Char('d') => demo.discard(&*profiles, &mut OsRng).await,
      KeyCode::Char('a') => {
        self.demo_cursor = 0;
        demo.open_picker();
      }
      KeyCode::Char('x') => demo.dismiss_message(),
      _ => {}
    }
    Ok(true)
  }
}
