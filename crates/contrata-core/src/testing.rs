//! In-memory [`CandidateStore`] used by the unit tests of this crate.

use std::sync::{
  Mutex,
  atomic::{AtomicBool, AtomicUsize, Ordering},
};

use chrono::{DateTime, Duration, TimeZone as _, Utc};
use uuid::Uuid;

use crate::{
  candidate::{CandidateRecord, CandidateStatus, NewCandidate},
  store::{CandidateStore, Cursor},
};

#[derive(Debug, thiserror::Error)]
#[error("store unavailable")]
pub struct Unavailable;

#[derive(Default)]
pub struct MemoryStore {
  records:     Mutex<Vec<CandidateRecord>>,
  pub failing: AtomicBool,
  pub inserts: AtomicUsize,
}

pub fn epoch() -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() }

/// A record created `minute` minutes after the test epoch.
pub fn record(minute: i64, status: CandidateStatus) -> CandidateRecord {
  CandidateRecord {
    candidate_id:     Uuid::new_v4(),
    paternal_surname: Some(format!("Apellido{minute}")),
    maternal_surname: None,
    given_names:      Some(format!("Nombre{minute}")),
    birth_date:       None,
    experience:       None,
    education:        None,
    languages:        None,
    notes:            None,
    phone:            None,
    status,
    created_at:       epoch() + Duration::minutes(minute),
  }
}

impl MemoryStore {
  pub fn with(records: Vec<CandidateRecord>) -> Self {
    Self { records: Mutex::new(records), ..Self::default() }
  }

  pub fn fail(&self, on: bool) { self.failing.store(on, Ordering::SeqCst); }

  fn check(&self) -> Result<(), Unavailable> {
    if self.failing.load(Ordering::SeqCst) { Err(Unavailable) } else { Ok(()) }
  }
}

impl CandidateStore for MemoryStore {
  type Error = Unavailable;

  async fn insert_candidate(&self, input: NewCandidate) -> Result<CandidateRecord, Unavailable> {
    self.check()?;
    self.inserts.fetch_add(1, Ordering::SeqCst);
    let mut records = self.records.lock().unwrap();
    let created_at = records
      .iter()
      .map(|r| r.created_at)
      .max()
      .unwrap_or_else(epoch)
      + Duration::minutes(1);
    let record = input.into_record(Uuid::new_v4(), created_at);
    records.push(record.clone());
    Ok(record)
  }

  async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateRecord>, Unavailable> {
    self.check()?;
    let records = self.records.lock().unwrap();
    Ok(records.iter().find(|r| r.candidate_id == id).cloned())
  }

  async fn set_status(&self, id: Uuid, status: CandidateStatus) -> Result<(), Unavailable> {
    self.check()?;
    let mut records = self.records.lock().unwrap();
    if let Some(r) = records.iter_mut().find(|r| r.candidate_id == id) {
      r.status = status;
    }
    Ok(())
  }

  async fn fetch_batch(
    &self,
    after: Option<Cursor>,
    limit: usize,
  ) -> Result<Vec<CandidateRecord>, Unavailable> {
    self.check()?;
    let mut records = self.records.lock().unwrap().clone();
    records.sort_by(|a, b| {
      (b.created_at, b.candidate_id).cmp(&(a.created_at, a.candidate_id))
    });
    Ok(
      records
        .into_iter()
        .filter(|r| after.is_none_or(|c| c.precedes(r)))
        .take(limit)
        .collect(),
    )
  }
}
