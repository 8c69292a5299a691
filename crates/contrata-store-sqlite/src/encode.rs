//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings with exactly six fractional digits and a
//! `Z` suffix, so lexical order equals chronological order. UUIDs are stored
//! as hyphenated lowercase strings, whose lexical order equals their byte
//! order.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound as _, Utc};
use contrata_core::{
  candidate::{CandidateRecord, CandidateStatus},
  identity::{Role, UserAccount},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(e.to_string()))
}

/// Like [`decode_date`], but a malformed value reads as absent.
pub fn decode_date_lossy(s: &str) -> Option<NaiveDate> {
  decode_date(s)
    .inspect_err(|e| tracing::warn!(value = s, error = %e, "ignoring malformed birth date"))
    .ok()
}

/// The stored form of `status`; active is written as absent.
pub fn encode_status(status: CandidateStatus) -> Option<&'static str> {
  (!status.is_active()).then(|| status.as_str())
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const CANDIDATE_COLUMNS: &str = "candidate_id, paternal_surname, maternal_surname, \
   given_names, birth_date, experience, education, languages, notes, phone, status, \
   created_at";

/// Raw strings read directly from a `candidates` row.
pub struct RawCandidate {
  pub candidate_id:     String,
  pub paternal_surname: Option<String>,
  pub maternal_surname: Option<String>,
  pub given_names:      Option<String>,
  pub birth_date:       Option<String>,
  pub experience:       Option<String>,
  pub education:        Option<String>,
  pub languages:        Option<String>,
  pub notes:            Option<String>,
  pub phone:            Option<String>,
  pub status:           Option<String>,
  pub created_at:       String,
}

impl RawCandidate {
  /// Map a row selected with [`CANDIDATE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      candidate_id:     row.get(0)?,
      paternal_surname: row.get(1)?,
      maternal_surname: row.get(2)?,
      given_names:      row.get(3)?,
      birth_date:       row.get(4)?,
      experience:       row.get(5)?,
      education:        row.get(6)?,
      languages:        row.get(7)?,
      notes:            row.get(8)?,
      phone:            row.get(9)?,
      status:           row.get(10)?,
      created_at:       row.get(11)?,
    })
  }

  /// Only the key and timestamp must decode; a malformed birth date or an
  /// unknown status degrades instead of failing the row.
  pub fn into_record(self) -> Result<CandidateRecord> {
    Ok(CandidateRecord {
      candidate_id:     decode_uuid(&self.candidate_id)?,
      paternal_surname: self.paternal_surname,
      maternal_surname: self.maternal_surname,
      given_names:      self.given_names,
      birth_date:       self.birth_date.as_deref().and_then(decode_date_lossy),
      experience:       self.experience,
      education:        self.education,
      languages:        self.languages,
      notes:            self.notes,
      phone:            self.phone,
      status:           CandidateStatus::decode(self.status.as_deref()),
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub email:         String,
  pub password_hash: String,
  pub role:          Option<String>,
  pub created_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      role:          row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_account(self) -> Result<UserAccount> {
    Ok(UserAccount {
      user_id:       decode_uuid(&self.user_id)?,
      email:         self.email,
      password_hash: self.password_hash,
      role:          self.role.as_deref().map(str::parse::<Role>).transpose()?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let a = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    let b = a + chrono::Duration::microseconds(1);
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(encode_dt(a), "2025-01-01T09:00:00.000000Z");
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn uuid_text_order_matches_byte_order() {
    let mut ids: Vec<Uuid> = (0..64).map(|_| Uuid::new_v4()).collect();
    let mut texts: Vec<String> = ids.iter().copied().map(encode_uuid).collect();
    ids.sort();
    texts.sort();
    assert_eq!(ids.into_iter().map(encode_uuid).collect::<Vec<_>>(), texts);
  }

  #[test]
  fn unknown_status_and_bad_date_degrade() {
    let raw = RawCandidate {
      candidate_id:     encode_uuid(Uuid::new_v4()),
      paternal_surname: None,
      maternal_surname: None,
      given_names:      None,
      birth_date:       Some("16/10/2006".into()),
      experience:       None,
      education:        None,
      languages:        None,
      notes:            None,
      phone:            None,
      status:           Some("Contratado".into()),
      created_at:       encode_dt(now()),
    };
    let record = raw.into_record().unwrap();
    assert_eq!(record.status, CandidateStatus::Unrecognized);
    assert_eq!(record.birth_date, None);
  }

  #[test]
  fn active_status_is_stored_as_absent() {
    assert_eq!(encode_status(CandidateStatus::Active), None);
    assert_eq!(encode_status(CandidateStatus::Discarded), Some("Eliminado"));
  }
}
