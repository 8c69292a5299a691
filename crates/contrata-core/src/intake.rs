//! The candidate intake form.
//!
//! Fields are held as typed text. Submission validates every required field
//! before touching the store, and at most one submission is in flight per
//! [`Intake`] at a time.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use strum::{EnumIter, IntoEnumIterator as _};

use crate::{
  Error, Result,
  candidate::{CandidateRecord, NewCandidate},
  store::CandidateStore,
};

/// Accepted birth date spellings, tried in order.
pub const BIRTH_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d"];

/// Parse a typed birth date; `None` if no accepted format matches.
pub fn parse_birth_date(text: &str) -> Option<NaiveDate> {
  let text = text.trim();
  BIRTH_DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

// ─── Fields ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum IntakeField {
  PaternalSurname,
  MaternalSurname,
  GivenNames,
  BirthDate,
  Languages,
  Education,
  Experience,
  Notes,
  Phone,
}

impl IntakeField {
  /// All fields in form order.
  pub fn all() -> Vec<Self> { Self::iter().collect() }

  /// Machine name, as reported in validation errors.
  pub fn key(self) -> &'static str {
    match self {
      Self::PaternalSurname => "paternal_surname",
      Self::MaternalSurname => "maternal_surname",
      Self::GivenNames => "given_names",
      Self::BirthDate => "birth_date",
      Self::Languages => "languages",
      Self::Education => "education",
      Self::Experience => "experience",
      Self::Notes => "notes",
      Self::Phone => "phone",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::PaternalSurname => "Apellido paterno",
      Self::MaternalSurname => "Apellido materno",
      Self::GivenNames => "Nombre(s)",
      Self::BirthDate => "Fecha de nacimiento (DD/MM/AAAA)",
      Self::Languages => "Idioma(s)",
      Self::Education => "Estudios",
      Self::Experience => "Experiencia",
      Self::Notes => "Notas",
      Self::Phone => "Teléfono",
    }
  }

  pub fn required(self) -> bool { !matches!(self, Self::Notes | Self::Phone) }
}

/// Text typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeFields {
  pub paternal_surname: String,
  pub maternal_surname: String,
  pub given_names:      String,
  pub birth_date:       String,
  pub languages:        String,
  pub education:        String,
  pub experience:       String,
  pub notes:            String,
  pub phone:            String,
}

impl IntakeFields {
  pub fn get(&self, field: IntakeField) -> &str {
    match field {
      IntakeField::PaternalSurname => &self.paternal_surname,
      IntakeField::MaternalSurname => &self.maternal_surname,
      IntakeField::GivenNames => &self.given_names,
      IntakeField::BirthDate => &self.birth_date,
      IntakeField::Languages => &self.languages,
      IntakeField::Education => &self.education,
      IntakeField::Experience => &self.experience,
      IntakeField::Notes => &self.notes,
      IntakeField::Phone => &self.phone,
    }
  }

  pub fn get_mut(&mut self, field: IntakeField) -> &mut String {
    match field {
      IntakeField::PaternalSurname => &mut self.paternal_surname,
      IntakeField::MaternalSurname => &mut self.maternal_surname,
      IntakeField::GivenNames => &mut self.given_names,
      IntakeField::BirthDate => &mut self.birth_date,
      IntakeField::Languages => &mut self.languages,
      IntakeField::Education => &mut self.education,
      IntakeField::Experience => &mut self.experience,
      IntakeField::Notes => &mut self.notes,
      IntakeField::Phone => &mut self.phone,
    }
  }

  pub fn missing_fields(&self) -> Vec<&'static str> {
    IntakeField::iter()
      .filter(|f| f.required() && self.get(*f).trim().is_empty())
      .map(IntakeField::key)
      .collect()
  }

  /// Validate and build the insert payload. An unparseable birth date is
  /// stored as absent.
  pub fn to_new_candidate(&self) -> Result<NewCandidate> {
    let missing = self.missing_fields();
    if !missing.is_empty() {
      return Err(Error::MissingFields(missing));
    }
    let optional = |s: &str| {
      let s = s.trim();
      (!s.is_empty()).then(|| s.to_owned())
    };
    Ok(NewCandidate {
      paternal_surname: self.paternal_surname.trim().to_owned(),
      maternal_surname: self.maternal_surname.trim().to_owned(),
      given_names:      self.given_names.trim().to_owned(),
      birth_date:       parse_birth_date(&self.birth_date),
      experience:       self.experience.trim().to_owned(),
      education:        self.education.trim().to_owned(),
      languages:        self.languages.trim().to_owned(),
      notes:            optional(&self.notes),
      phone:            optional(&self.phone),
    })
  }

  pub fn clear(&mut self) { *self = Self::default(); }
}

// ─── Submission ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
  Submitted(CandidateRecord),
  /// Another submission was still in flight; nothing was done.
  Ignored,
}

/// Re-entrancy guard for form submission.
#[derive(Debug, Default)]
pub struct Intake {
  in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
  fn drop(&mut self) { self.0.store(false, Ordering::Release); }
}

impl Intake {
  pub fn new() -> Self { Self::default() }

  pub fn is_submitting(&self) -> bool { self.in_flight.load(Ordering::Acquire) }

  fn acquire(&self) -> Option<InFlight<'_>> {
    self
      .in_flight
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .ok()
      .map(|_| InFlight(&self.in_flight))
  }

  /// Insert the form as a new candidate.
  ///
  /// On success the fields are cleared. On a validation or store error they
  /// are left intact for a retry.
  pub async fn submit<S: CandidateStore>(
    &self,
    store: &S,
    fields: &mut IntakeFields,
  ) -> Result<SubmitOutcome> {
    let Some(_guard) = self.acquire() else {
      tracing::debug!("intake submission already in flight");
      return Ok(SubmitOutcome::Ignored);
    };

    let input = fields.to_new_candidate()?;
    let record = store.insert_candidate(input).await.map_err(Error::store)?;
    tracing::info!(candidate_id = %record.candidate_id, "candidate registered");

    fields.clear();
    Ok(SubmitOutcome::Submitted(record))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::Ordering;

  use uuid::Uuid;

  use super::*;
  use crate::{
    candidate::CandidateStatus,
    store::Cursor,
    testing::{MemoryStore, Unavailable},
  };

  fn filled() -> IntakeFields {
    IntakeFields {
      paternal_surname: "Rojas".into(),
      maternal_surname: "Soto".into(),
      given_names:      "Ana".into(),
      birth_date:       "07/03/1998".into(),
      languages:        "Español, Inglés".into(),
      education:        "Ingeniería civil".into(),
      experience:       "3 años".into(),
      notes:            String::new(),
      phone:            "+56 9 1234 5678".into(),
    }
  }

  /// Yields once before delegating so a second submission can interleave.
  struct SlowStore(MemoryStore);

  impl CandidateStore for SlowStore {
    type Error = Unavailable;

    async fn insert_candidate(&self, input: NewCandidate) -> Result<CandidateRecord, Unavailable> {
      tokio::task::yield_now().await;
      self.0.insert_candidate(input).await
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateRecord>, Unavailable> {
      self.0.get_candidate(id).await
    }

    async fn set_status(&self, id: Uuid, status: CandidateStatus) -> Result<(), Unavailable> {
      self.0.set_status(id, status).await
    }

    async fn fetch_batch(
      &self,
      after: Option<Cursor>,
      limit: usize,
    ) -> Result<Vec<CandidateRecord>, Unavailable> {
      self.0.fetch_batch(after, limit).await
    }
  }

  #[test]
  fn birth_date_formats() {
    let expected = NaiveDate::from_ymd_opt(1998, 3, 7);
    assert_eq!(parse_birth_date("07/03/1998"), expected);
    assert_eq!(parse_birth_date(" 1998-03-07 "), expected);
    assert_eq!(parse_birth_date("31/02/1998"), None);
    assert_eq!(parse_birth_date("ayer"), None);
  }

  #[tokio::test]
  async fn submit_inserts_and_clears() {
    let store = MemoryStore::default();
    let intake = Intake::new();
    let mut fields = filled();

    let outcome = intake.submit(&store, &mut fields).await.unwrap();
    let SubmitOutcome::Submitted(record) = outcome else {
      panic!("expected a submission");
    };
    assert_eq!(record.status, CandidateStatus::Active);
    assert_eq!(record.birth_date, NaiveDate::from_ymd_opt(1998, 3, 7));
    assert_eq!(record.notes, None);
    assert_eq!(record.phone.as_deref(), Some("+56 9 1234 5678"));
    assert_eq!(fields, IntakeFields::default());
    assert!(!intake.is_submitting());
  }

  #[tokio::test]
  async fn each_missing_required_field_blocks_insert() {
    let store = MemoryStore::default();
    let intake = Intake::new();

    for field in IntakeField::all().into_iter().filter(|f| f.required()) {
      let mut fields = filled();
      fields.get_mut(field).clear();

      let err = intake.submit(&store, &mut fields).await.unwrap_err();
      assert!(
        matches!(&err, Error::MissingFields(m) if m == &[field.key()]),
        "{field:?}: {err}"
      );
      assert!(!intake.is_submitting());
    }
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn unparseable_birth_date_is_stored_absent() {
    let store = MemoryStore::default();
    let mut fields = filled();
    fields.birth_date = "marzo".into();

    let outcome = Intake::new().submit(&store, &mut fields).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Submitted(r) if r.birth_date.is_none()));
  }

  #[tokio::test]
  async fn store_failure_keeps_fields() {
    let store = MemoryStore::default();
    store.fail(true);
    let intake = Intake::new();
    let mut fields = filled();

    let err = intake.submit(&store, &mut fields).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(fields, filled());
    assert!(!intake.is_submitting());
  }

  #[tokio::test]
  async fn second_submit_while_in_flight_is_ignored() {
    let store = SlowStore(MemoryStore::default());
    let intake = Intake::new();
    let mut first = filled();
    let mut second = filled();

    let (a, b) = tokio::join!(
      intake.submit(&store, &mut first),
      intake.submit(&store, &mut second),
    );
    assert!(matches!(a.unwrap(), SubmitOutcome::Submitted(_)));
    assert_eq!(b.unwrap(), SubmitOutcome::Ignored);
    assert_eq!(store.0.inserts.load(Ordering::SeqCst), 1);
    assert_eq!(second, filled());
  }
}
