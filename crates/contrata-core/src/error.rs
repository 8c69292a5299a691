//! Error types for `contrata-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::candidate::CandidateStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("candidate not found: {0}")]
  CandidateNotFound(Uuid),

  #[error("no candidate profile is open")]
  NoProfileOpen,

  /// Discard and hire are only offered while a candidate is active.
  #[error("candidate {id} is {status} and cannot be transitioned")]
  NotActionable { id: Uuid, status: CandidateStatus },

  #[error("unknown status value: {0:?}")]
  UnknownStatus(String),

  #[error("unknown department: {0:?}")]
  UnknownDepartment(String),

  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  #[error("missing required fields: {}", .0.join(", "))]
  MissingFields(Vec<&'static str>),

  #[error("email and password are required")]
  MissingCredentials,

  #[error("incorrect email or password")]
  InvalidCredentials,

  #[error("no role assigned to user {0}")]
  MissingRole(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  /// Whether the operator can retry the same action unchanged.
  pub fn is_transient(&self) -> bool { matches!(self, Self::Store(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
