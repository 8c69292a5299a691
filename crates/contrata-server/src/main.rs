//! contrata-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `CONTRATA_*`
//! environment variables, opens the SQLite store, and serves the JSON API.
//!
//! # Creating accounts
//!
//! ```text
//! contrata-server --add-user ana@example.com --role entrevistador
//! ```
//!
//! prompts for a password on stdin, stores its argon2 hash, and exits.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use contrata_core::identity::{Role, UserDirectory as _};
use contrata_server::{AppState, ServerConfig, auth::hash_password};
use contrata_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Contrata recruiting API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Create an account with this email, reading its password from stdin,
  /// then exit.
  #[arg(long, value_name = "EMAIL")]
  add_user: Option<String>,

  /// Role for `--add-user`: `entrevistador` or `empresa`.
  #[arg(long, requires = "add_user", value_parser = parse_role)]
  role: Option<Role>,
}

fn parse_role(s: &str) -> Result<Role, String> { s.parse().map_err(|e| format!("{e}")) }

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .set_default("store_path", "~/.local/share/contrata/contrata.db")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CONTRATA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: create an account and exit.
  if let Some(email) = cli.add_user {
    let password = read_password()?;
    anyhow::ensure!(!password.is_empty(), "password must not be empty");
    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    let account = store
      .add_user(email, hash, cli.role)
      .await
      .context("failed to create user")?;
    println!("{} {}", account.user_id, account.email);
    return Ok(());
  }

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let app = contrata_server::router(AppState::new(store, server_cfg));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
