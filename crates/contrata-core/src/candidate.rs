//! Candidate records: the documents of the `postulados` collection.
//!
//! A record is created once by intake and afterwards only its status ever
//! changes, exactly once, from active to discarded or hired. Records are never
//! deleted; the status is a soft marker.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator as _};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Department ──────────────────────────────────────────────────────────────

/// The fixed set of departments a candidate can be hired into. The name is
/// stored verbatim as the record's status.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum Department {
  #[serde(rename = "TI")]
  Ti,
  #[serde(rename = "Sociales")]
  Sociales,
}

impl Department {
  /// The stored and displayed name.
  pub fn name(self) -> &'static str {
    match self {
      Self::Ti => "TI",
      Self::Sociales => "Sociales",
    }
  }

  /// All departments in display order.
  pub fn all() -> Vec<Self> { Self::iter().collect() }
}

impl fmt::Display for Department {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Department {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::iter()
      .find(|d| d.name() == s)
      .ok_or_else(|| Error::UnknownDepartment(s.to_owned()))
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub const ACTIVE_MARKER: &str = "Postulado";
pub const DISCARDED_MARKER: &str = "Eliminado";
/// Wire spelling of [`CandidateStatus::Unrecognized`]; never written to the
/// store.
pub const UNRECOGNIZED_MARKER: &str = "Desconocido";

/// Where a candidate stands in the review lifecycle.
///
/// Persisted as a nullable string: absent and `"Postulado"` both mean
/// [`CandidateStatus::Active`], `"Eliminado"` means discarded, and a
/// department name means hired into it. Any other stored value decodes as
/// [`CandidateStatus::Unrecognized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum CandidateStatus {
  /// Awaiting a decision; the only state from which transitions are allowed.
  #[default]
  Active,
  Discarded,
  Hired(Department),
  /// Decided, but into a department this build does not know. No listing
  /// shows it and no decision applies to it.
  Unrecognized,
}

impl CandidateStatus {
  pub fn is_active(&self) -> bool { matches!(self, Self::Active) }

  /// Decode the stored representation, treating absence as active and
  /// anything unknown as [`CandidateStatus::Unrecognized`].
  pub fn decode(stored: Option<&str>) -> Self {
    match stored.map(str::parse::<Self>) {
      None => Self::Active,
      Some(Ok(status)) => status,
      Some(Err(e)) => {
        tracing::warn!(error = %e, "treating stored status as unrecognized");
        Self::Unrecognized
      }
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Active => ACTIVE_MARKER,
      Self::Discarded => DISCARDED_MARKER,
      Self::Hired(d) => d.name(),
      Self::Unrecognized => UNRECOGNIZED_MARKER,
    }
  }
}

impl fmt::Display for CandidateStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for CandidateStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      ACTIVE_MARKER => Ok(Self::Active),
      DISCARDED_MARKER => Ok(Self::Discarded),
      other => other
        .parse::<Department>()
        .map(Self::Hired)
        .map_err(|_| Error::UnknownStatus(other.to_owned())),
    }
  }
}

impl From<Option<String>> for CandidateStatus {
  fn from(value: Option<String>) -> Self { Self::decode(value.as_deref()) }
}

impl From<CandidateStatus> for String {
  fn from(status: CandidateStatus) -> Self { status.as_str().to_owned() }
}

// ─── Age ─────────────────────────────────────────────────────────────────────

const DAYS_PER_YEAR: f64 = 365.25;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Whole years between `birth_date` (taken at midnight UTC) and `now`.
///
/// Returns `None` for a birth date in the future.
pub fn age_at(birth_date: NaiveDate, now: DateTime<Utc>) -> Option<u32> {
  let born = birth_date.and_time(NaiveTime::MIN).and_utc();
  let elapsed = now.signed_duration_since(born).num_seconds();
  if elapsed < 0 {
    return None;
  }
  let years = elapsed as f64 / (DAYS_PER_YEAR * SECONDS_PER_DAY);
  Some(years.floor() as u32)
}

/// Age as shown to the operator; empty when the birth date is unknown.
pub fn display_age(birth_date: Option<NaiveDate>, now: DateTime<Utc>) -> String {
  birth_date
    .and_then(|d| age_at(d, now))
    .map(|a| a.to_string())
    .unwrap_or_default()
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A stored candidate. Every descriptive field is optional because the
/// collection may hold documents written by older clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
  pub candidate_id:     Uuid,
  pub paternal_surname: Option<String>,
  pub maternal_surname: Option<String>,
  pub given_names:      Option<String>,
  pub birth_date:       Option<NaiveDate>,
  pub experience:       Option<String>,
  pub education:        Option<String>,
  pub languages:        Option<String>,
  pub notes:            Option<String>,
  pub phone:            Option<String>,
  #[serde(default)]
  pub status:           CandidateStatus,
  /// Store-assigned; the listing sort key.
  pub created_at:       DateTime<Utc>,
}

impl CandidateRecord {
  /// Paternal surname, maternal surname, and given names, skipping blanks.
  pub fn full_name(&self) -> String {
    [
      self.paternal_surname.as_deref(),
      self.maternal_surname.as_deref(),
      self.given_names.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
  }

  pub fn age(&self, now: DateTime<Utc>) -> String {
    display_age(self.birth_date, now)
  }

  /// One-line listing form: `surname names - age - experience - education`.
  pub fn summary(&self, now: DateTime<Utc>) -> String {
    format!(
      "{} {} - {} - {} - {}",
      self.paternal_surname.as_deref().unwrap_or_default(),
      self.given_names.as_deref().unwrap_or_default(),
      self.age(now),
      self.experience.as_deref().unwrap_or_default(),
      self.education.as_deref().unwrap_or_default(),
    )
  }
}

// ─── NewCandidate ────────────────────────────────────────────────────────────

/// Input to [`crate::store::CandidateStore::insert_candidate`]. The key,
/// status, and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCandidate {
  pub paternal_surname: String,
  pub maternal_surname: String,
  pub given_names:      String,
  pub birth_date:       Option<NaiveDate>,
  pub experience:       String,
  pub education:        String,
  pub languages:        String,
  #[serde(default)]
  pub notes:            Option<String>,
  #[serde(default)]
  pub phone:            Option<String>,
}

impl NewCandidate {
  /// Names of the required fields that are blank.
  pub fn missing_fields(&self) -> Vec<&'static str> {
    [
      ("paternal_surname", &self.paternal_surname),
      ("maternal_surname", &self.maternal_surname),
      ("given_names", &self.given_names),
      ("languages", &self.languages),
      ("education", &self.education),
      ("experience", &self.experience),
    ]
    .into_iter()
    .filter(|(_, v)| v.trim().is_empty())
    .map(|(name, _)| name)
    .collect()
  }

  pub fn validate(&self) -> Result<()> {
    let missing = self.missing_fields();
    if missing.is_empty() {
      Ok(())
    } else {
      Err(Error::MissingFields(missing))
    }
  }

  /// Build the stored record for this input.
  pub fn into_record(
    self,
    candidate_id: Uuid,
    created_at: DateTime<Utc>,
  ) -> CandidateRecord {
    CandidateRecord {
      candidate_id,
      paternal_surname: Some(self.paternal_surname),
      maternal_surname: Some(self.maternal_surname),
      given_names: Some(self.given_names),
      birth_date: self.birth_date,
      experience: Some(self.experience),
      education: Some(self.education),
      languages: Some(self.languages),
      notes: self.notes,
      phone: self.phone,
      status: CandidateStatus::Active,
      created_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Datelike as _, TimeZone as _};

  use super::*;

  #[test]
  fn status_decodes_absent_and_postulado_as_active() {
    assert_eq!(CandidateStatus::decode(None), CandidateStatus::Active);
    assert_eq!(CandidateStatus::decode(Some("Postulado")), CandidateStatus::Active);
    assert_eq!(CandidateStatus::decode(Some("Eliminado")), CandidateStatus::Discarded);
    assert_eq!(
      CandidateStatus::decode(Some("Sociales")),
      CandidateStatus::Hired(Department::Sociales)
    );
  }

  #[test]
  fn unknown_stored_status_is_decided_but_unrecognized() {
    let status = CandidateStatus::decode(Some("Ventas"));
    assert_eq!(status, CandidateStatus::Unrecognized);
    assert!(!status.is_active());

    let parsed: CandidateStatus = serde_json::from_value(serde_json::json!("Finanzas")).unwrap();
    assert_eq!(parsed, CandidateStatus::Unrecognized);
  }

  #[test]
  fn explicit_parse_rejects_unknown_values() {
    let err = "Ventas".parse::<CandidateStatus>().unwrap_err();
    assert!(matches!(err, Error::UnknownStatus(s) if s == "Ventas"));
  }

  #[test]
  fn status_serde_uses_stored_strings() {
    let json = serde_json::to_value(CandidateStatus::Hired(Department::Ti)).unwrap();
    assert_eq!(json, serde_json::json!("TI"));

    let parsed: CandidateStatus = serde_json::from_value(serde_json::Value::Null).unwrap();
    assert_eq!(parsed, CandidateStatus::Active);
  }

  #[test]
  fn only_active_is_actionable() {
    assert!(CandidateStatus::Active.is_active());
    assert!(!CandidateStatus::Discarded.is_active());
    for d in Department::all() {
      assert!(!CandidateStatus::Hired(d).is_active());
    }
  }

  #[test]
  fn age_twenty_years_ago_is_twenty() {
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 15, 30, 0).unwrap();
    let birth = NaiveDate::from_ymd_opt(now.year() - 20, 10, 16).unwrap();
    assert_eq!(age_at(birth, now), Some(20));
  }

  #[test]
  fn age_day_before_birthday_is_one_less() {
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    let birth = NaiveDate::from_ymd_opt(2006, 10, 18).unwrap();
    assert_eq!(age_at(birth, now), Some(19));
  }

  #[test]
  fn absent_or_future_birth_date_displays_empty() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(display_age(None, now), "");
    let future = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    assert_eq!(display_age(Some(future), now), "");
  }

  #[test]
  fn missing_fields_are_listed_in_form_order() {
    let input = NewCandidate {
      paternal_surname: "Rojas".into(),
      maternal_surname: " ".into(),
      given_names:      "Ana".into(),
      birth_date:       None,
      experience:       String::new(),
      education:        "Ingeniería".into(),
      languages:        "Español".into(),
      notes:            None,
      phone:            None,
    };
    assert_eq!(input.missing_fields(), ["maternal_surname", "experience"]);
    assert!(matches!(input.validate(), Err(Error::MissingFields(_))));
  }

  #[test]
  fn full_name_skips_missing_parts() {
    let record = CandidateRecord {
      candidate_id:     Uuid::new_v4(),
      paternal_surname: Some("Rojas".into()),
      maternal_surname: None,
      given_names:      Some("Ana María".into()),
      birth_date:       None,
      experience:       None,
      education:        None,
      languages:        None,
      notes:            None,
      phone:            None,
      status:           CandidateStatus::Active,
      created_at:       Utc::now(),
    };
    assert_eq!(record.full_name(), "Rojas Ana María");
    assert_eq!(record.summary(Utc::now()), "Rojas Ana María -  -  - ");
  }
}
