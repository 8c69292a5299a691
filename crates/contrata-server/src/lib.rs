//! JSON API server for Contrata.
//!
//! Exposes an axum [`Router`] over any backend implementing both
//! [`CandidateStore`] and [`UserDirectory`]. Clients authenticate with a
//! bearer token obtained from `POST /api/auth/sign-in`; each route is gated
//! on the caller's role.
//!
//! | Method | Path | Role |
//! |--------|------|------|
//! | `POST` | `/api/auth/sign-in` | none |
//! | `POST` | `/api/auth/sign-out` | any |
//! | `GET`  | `/api/users/{id}/role` | self |
//! | `GET`  | `/api/review/config` | empresa |
//! | `GET`  | `/api/candidates` | empresa |
//! | `POST` | `/api/candidates` | entrevistador |
//! | `GET`  | `/api/candidates/{id}` | empresa |
//! | `PUT`  | `/api/candidates/{id}/status` | empresa |
//! | `GET`  | `/health` | none |

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use contrata_core::{
  identity::UserDirectory,
  review::{DEFAULT_OVERFETCH, DEFAULT_PAGE_SIZE, MoreHeuristic, PageConfig},
  store::CandidateStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::SessionRegistry;
use handlers::{
  candidates::{self, MAX_BATCH},
  sessions, users,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CONTRATA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Visible records per review page, handed to clients.
  #[serde(default = "default_page_size")]
  pub page_size:  usize,
  /// Raw records per fetch; also the default batch limit.
  #[serde(default = "default_overfetch")]
  pub overfetch:  usize,
  #[serde(default)]
  pub heuristic:  MoreHeuristic,
}

fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }
fn default_overfetch() -> usize { DEFAULT_OVERFETCH }

impl ServerConfig {
  /// Paging handed to clients. Both sizes are clamped to what one
  /// `GET /api/candidates` call will return, so a full raw batch is always
  /// observable.
  pub fn page_config(&self) -> PageConfig {
    let page_size = self.page_size.clamp(1, MAX_BATCH);
    PageConfig {
      page_size,
      overfetch: self.overfetch.clamp(page_size, MAX_BATCH),
      heuristic: self.heuristic,
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Backends the server can run on.
pub trait Backend: CandidateStore + UserDirectory + 'static {}

impl<T: CandidateStore + UserDirectory + 'static> Backend for T {}

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub config:   Arc<ServerConfig>,
  pub sessions: Arc<SessionRegistry>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      config:   Arc::clone(&self.config),
      sessions: Arc::clone(&self.sessions),
    }
  }
}

impl<S> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    Self {
      store:    Arc::new(store),
      config:   Arc::new(config),
      sessions: Arc::new(SessionRegistry::default()),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the application [`Router`], wrapped in request tracing.
pub fn router<S: Backend>(state: AppState<S>) -> Router {
  let api = Router::new()
    // Sessions
    .route("/auth/sign-in", post(sessions::sign_in::<S>))
    .route("/auth/sign-out", post(sessions::sign_out::<S>))
    // Users
    .route("/users/{id}/role", get(users::role::<S>))
    // Review
    .route("/review/config", get(candidates::review_config::<S>))
    .route(
      "/candidates",
      get(candidates::list::<S>).post(candidates::create::<S>),
    )
    .route("/candidates/{id}", get(candidates::get_one::<S>))
    .route("/candidates/{id}/status", put(candidates::set_status::<S>));

  Router::new()
    .nest("/api", api)
    .route("/health", get(health))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn health() -> &'static str { "ok" }
