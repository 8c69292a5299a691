//! Password verification, bearer sessions, and the authenticated-caller
//! extractor.
//!
//! Tokens are 32 random bytes, hex-encoded, handed to the client once.
//! The server keeps only their SHA-256 digest, in memory; a restart signs
//! everyone out.

use std::collections::HashMap;

use argon2::{
  Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use contrata_core::identity::{IdentityProvider, Role, UserDirectory};
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest as _, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{AppState, Backend, error::ApiError};

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Whether `password` matches the PHC string `hash`. A malformed hash never
/// matches.
pub fn verify_password(hash: &str, password: &str) -> bool {
  PasswordHash::new(hash).is_ok_and(|parsed| {
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
}

/// Email/password sign-in over a [`UserDirectory`].
pub struct PasswordIdentity<'a, D>(pub &'a D);

impl<D: UserDirectory> IdentityProvider for PasswordIdentity<'_, D> {
  type Error = D::Error;

  async fn sign_in(&self, email: &str, password: &str) -> Result<Option<Uuid>, D::Error> {
    let Some(account) = self.0.find_user_by_email(email).await? else {
      return Ok(None);
    };
    Ok(verify_password(&account.password_hash, password).then_some(account.user_id))
  }

  async fn role_of(&self, user_id: Uuid) -> Result<Option<Role>, D::Error> {
    self.0.get_role(user_id).await
  }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

/// What the server remembers about a signed-in caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
  pub user_id: Uuid,
  pub email:   String,
  /// Resolved at sign-in; `None` if the account has no role.
  pub role:    Option<Role>,
}

/// In-memory table of live sessions, keyed by token digest.
#[derive(Debug, Default)]
pub struct SessionRegistry {
  sessions: RwLock<HashMap<String, AuthSession>>,
}

fn digest(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

impl SessionRegistry {
  /// Store `session` and return the bearer token for it.
  pub async fn issue(&self, session: AuthSession) -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    self.sessions.write().await.insert(digest(&token), session);
    token
  }

  pub async fn resolve(&self, token: &str) -> Option<AuthSession> {
    self.sessions.read().await.get(&digest(token)).cloned()
  }

  /// Drop the session for `token`; `false` if there was none.
  pub async fn revoke(&self, token: &str) -> bool {
    self.sessions.write().await.remove(&digest(token)).is_some()
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The bearer token from an `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

/// An authenticated caller. Present in a handler means the bearer token
/// resolved to a live session.
#[derive(Debug, Clone)]
pub struct Authenticated {
  pub token:   String,
  pub session: AuthSession,
}

impl Authenticated {
  /// Reject callers without `role`.
  pub fn require(&self, role: Role) -> Result<&AuthSession, ApiError> {
    if self.session.role == Some(role) {
      Ok(&self.session)
    } else {
      tracing::debug!(user_id = %self.session.user_id, required = %role, "role check failed");
      Err(ApiError::Forbidden)
    }
  }
}

impl<S: Backend> FromRequestParts<AppState<S>> for Authenticated {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
    let session = state
      .sessions
      .resolve(token)
      .await
      .ok_or(ApiError::Unauthorized)?;
    Ok(Authenticated { token: token.to_owned(), session })
  }
}
