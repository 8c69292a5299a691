//! The `CandidateStore` trait and its cursor type.
//!
//! The store is a keyed document collection that can only answer ordered
//! range queries: newest first, strictly after a cursor, up to a row limit.
//! It cannot filter by status; listings do that after the fetch (see
//! [`crate::review`]).

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::candidate::{CandidateRecord, CandidateStatus, NewCandidate};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Position of a record in the listing order (`created_at` descending, ties
/// broken by `candidate_id` descending). A continuation query returns only
/// records that sort strictly after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
  pub created_at:   DateTime<Utc>,
  pub candidate_id: Uuid,
}

impl Cursor {
  /// The cursor positioned at `record`.
  pub fn at(record: &CandidateRecord) -> Self {
    Self {
      created_at:   record.created_at,
      candidate_id: record.candidate_id,
    }
  }

  /// Whether `record` sorts strictly after this cursor in listing order.
  pub fn precedes(&self, record: &CandidateRecord) -> bool {
    (record.created_at, record.candidate_id) < (self.created_at, self.candidate_id)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the candidate collection.
///
/// Implemented by the SQLite backend on the server and by the HTTP client in
/// the terminal UI, so the review workflow runs unchanged on either side.
pub trait CandidateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a new record. The store assigns the key and `created_at`; the
  /// status starts out active.
  fn insert_candidate(
    &self,
    input: NewCandidate,
  ) -> impl Future<Output = Result<CandidateRecord, Self::Error>> + Send + '_;

  /// Retrieve a record by key. Returns `None` if not found.
  fn get_candidate(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<CandidateRecord>, Self::Error>> + Send + '_;

  /// Overwrite the status of a record. Last write wins.
  fn set_status(
    &self,
    id: Uuid,
    status: CandidateStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Up to `limit` records in listing order, starting strictly after `after`
  /// or from the newest record when `after` is `None`.
  fn fetch_batch(
    &self,
    after: Option<Cursor>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<CandidateRecord>, Self::Error>> + Send + '_;
}
