//! Authenticated sessions and the role-gated shell.
//!
//! The shell is an explicit value owned by whatever drives the UI; it is
//! created empty, filled in at login, and emptied at logout. Nothing is
//! persisted across restarts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  identity::{IdentityProvider, Role},
};

/// Who is signed in and which workflow they get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub user_id:  Uuid,
  pub username: String,
  pub role:     Role,
}

/// Sign in with email and password, then resolve the user's role.
pub async fn login<I: IdentityProvider>(
  identity: &I,
  email: &str,
  password: &str,
) -> Result<Session> {
  let email = email.trim();
  if email.is_empty() || password.is_empty() {
    return Err(Error::MissingCredentials);
  }

  let user_id = identity
    .sign_in(email, password)
    .await
    .map_err(Error::store)?
    .ok_or(Error::InvalidCredentials)?;

  let role = identity
    .role_of(user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::MissingRole(user_id))?;

  tracing::info!(%user_id, %role, "signed in");
  Ok(Session { user_id, username: email.to_owned(), role })
}

// ─── Shell ───────────────────────────────────────────────────────────────────

/// The surface the shell renders for its current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
  Login,
  Intake,
  Review,
}

impl From<Role> for Surface {
  fn from(role: Role) -> Self {
    match role {
      Role::Interviewer => Self::Intake,
      Role::Employer => Self::Review,
    }
  }
}

#[derive(Debug, Default)]
pub struct Shell {
  session: Option<Session>,
}

impl Shell {
  pub fn new() -> Self { Self::default() }

  pub fn session(&self) -> Option<&Session> { self.session.as_ref() }

  pub fn surface(&self) -> Surface {
    self
      .session
      .as_ref()
      .map_or(Surface::Login, |s| Surface::from(s.role))
  }

  pub fn establish(&mut self, session: Session) -> Surface {
    self.session = Some(session);
    self.surface()
  }

  /// Drop the session and return to the login surface.
  pub fn sign_out(&mut self) -> Option<Session> { self.session.take() }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("identity backend unavailable")]
  struct Unavailable;

  struct FakeIdentity {
    accounts: HashMap<&'static str, (&'static str, Uuid)>,
    roles:    HashMap<Uuid, Role>,
    down:     bool,
  }

  impl FakeIdentity {
    fn new() -> (Self, Uuid, Uuid) {
      let interviewer = Uuid::new_v4();
      let roleless = Uuid::new_v4();
      let accounts = HashMap::from([
        ("ana@example.com", ("secret", interviewer)),
        ("nobody@example.com", ("secret", roleless)),
      ]);
      let roles = HashMap::from([(interviewer, Role::Interviewer)]);
      (Self { accounts, roles, down: false }, interviewer, roleless)
    }
  }

  impl IdentityProvider for FakeIdentity {
    type Error = Unavailable;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<Uuid>, Unavailable> {
      if self.down {
        return Err(Unavailable);
      }
      Ok(
        self
          .accounts
          .get(email)
          .filter(|(p, _)| *p == password)
          .map(|(_, id)| *id),
      )
    }

    async fn role_of(&self, user_id: Uuid) -> Result<Option<Role>, Unavailable> {
      Ok(self.roles.get(&user_id).copied())
    }
  }

  #[tokio::test]
  async fn login_resolves_role() {
    let (idp, id, _) = FakeIdentity::new();
    let session = login(&idp, " ana@example.com ", "secret").await.unwrap();
    assert_eq!(session.user_id, id);
    assert_eq!(session.username, "ana@example.com");
    assert_eq!(session.role, Role::Interviewer);
  }

  #[tokio::test]
  async fn login_errors() {
    let (mut idp, _, roleless) = FakeIdentity::new();

    assert!(matches!(login(&idp, "", "x").await, Err(Error::MissingCredentials)));
    assert!(matches!(
      login(&idp, "ana@example.com", "wrong").await,
      Err(Error::InvalidCredentials)
    ));
    assert!(matches!(
      login(&idp, "nobody@example.com", "secret").await,
      Err(Error::MissingRole(id)) if id == roleless
    ));

    idp.down = true;
    let err = login(&idp, "ana@example.com", "secret").await.unwrap_err();
    assert!(err.is_transient());
  }

  #[test]
  fn shell_routes_by_role() {
    let mut shell = Shell::new();
    assert_eq!(shell.surface(), Surface::Login);

    let surface = shell.establish(Session {
      user_id:  Uuid::new_v4(),
      username: "boss@example.com".into(),
      role:     Role::Employer,
    });
    assert_eq!(surface, Surface::Review);

    assert!(shell.sign_out().is_some());
    assert_eq!(shell.surface(), Surface::Login);
    assert!(shell.session().is_none());
  }
}
