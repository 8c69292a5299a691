//! Users, roles, and the identity seams.
//!
//! Sign-in yields a stable user id; the role is then looked up separately in
//! the `users` collection keyed by that id.

use std::{fmt, future::Future, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Role ────────────────────────────────────────────────────────────────────

/// What an authenticated user may do. Each role sees exactly one workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
  /// Registers candidates through the intake form.
  #[serde(rename = "entrevistador")]
  Interviewer,
  /// Reviews, discards, and hires candidates.
  #[serde(rename = "empresa", alias = "empleador")]
  Employer,
}

impl Role {
  /// Canonical stored spelling.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Interviewer => "entrevistador",
      Self::Employer => "empresa",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = Error;

  /// Accepts the legacy `"empleador"` spelling as [`Role::Employer`].
  fn from_str(s: &str) -> Result<Self> {
    match s {
      "entrevistador" => Ok(Self::Interviewer),
      "empresa" | "empleador" => Ok(Self::Employer),
      other => Err(Error::UnknownRole(other.to_owned())),
    }
  }
}

// ─── Accounts ────────────────────────────────────────────────────────────────

/// A row of the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
  pub user_id:       Uuid,
  pub email:         String,
  /// PHC string, e.g. `$argon2id$v=19$…`.
  pub password_hash: String,
  pub role:          Option<Role>,
  pub created_at:    DateTime<Utc>,
}

/// Persistence for user accounts. Implemented by storage backends; the
/// server layers password verification on top of it.
pub trait UserDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create an account. Emails are unique.
  fn add_user(
    &self,
    email: String,
    password_hash: String,
    role: Option<Role>,
  ) -> impl Future<Output = Result<UserAccount, Self::Error>> + Send + '_;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<UserAccount>, Self::Error>> + Send + 'a;

  /// The role attribute for `user_id`, if the user exists and has one.
  fn get_role(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;
}

// ─── Provider ────────────────────────────────────────────────────────────────

/// The two calls a login needs from the identity backend.
pub trait IdentityProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Check credentials; `Ok(None)` means they were rejected.
  fn sign_in<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + 'a;

  fn role_of(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn legacy_employer_spelling_is_accepted() {
    assert_eq!("empleador".parse::<Role>().unwrap(), Role::Employer);
    assert_eq!("empresa".parse::<Role>().unwrap(), Role::Employer);
    let role: Role = serde_json::from_str("\"empleador\"").unwrap();
    assert_eq!(role, Role::Employer);
  }

  #[test]
  fn canonical_spelling_is_written() {
    assert_eq!(Role::Employer.to_string(), "empresa");
    assert_eq!(
      serde_json::to_string(&Role::Interviewer).unwrap(),
      "\"entrevistador\""
    );
  }

  #[test]
  fn unknown_role_is_an_error() {
    assert!(matches!("admin".parse::<Role>(), Err(Error::UnknownRole(_))));
  }
}
