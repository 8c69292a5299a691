//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use chrono::NaiveDate;
use contrata_core::{
  candidate::{CandidateRecord, CandidateStatus, Department, NewCandidate},
  identity::{Role, UserDirectory},
  review::{Decision, Listing, PageConfig, ReviewWorkflow, decide, fetch_page},
  store::{CandidateStore, Cursor},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn candidate(given: &str) -> NewCandidate {
  NewCandidate {
    paternal_surname: "Pérez".into(),
    maternal_surname: "Lagos".into(),
    given_names:      given.into(),
    birth_date:       NaiveDate::from_ymd_opt(1995, 6, 15),
    experience:       "2 años en soporte".into(),
    education:        "Técnico en informática".into(),
    languages:        "Español".into(),
    notes:            None,
    phone:            Some("555-0100".into()),
  }
}

/// Insert `n` candidates, oldest first, with distinct timestamps.
async fn seed(s: &SqliteStore, n: usize) -> Vec<CandidateRecord> {
  let mut out = Vec::with_capacity(n);
  for i in 0..n {
    out.push(s.insert_candidate(candidate(&format!("C{i}"))).await.unwrap());
    tokio::time::sleep(Duration::from_millis(2)).await;
  }
  out
}

// ─── Candidates ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_candidate() {
  let s = store().await;

  let record = s.insert_candidate(candidate("Ana")).await.unwrap();
  assert_eq!(record.status, CandidateStatus::Active);

  let fetched = s.get_candidate(record.candidate_id).await.unwrap();
  assert_eq!(fetched, Some(record));
}

#[tokio::test]
async fn get_candidate_missing_returns_none() {
  let s = store().await;
  assert!(s.get_candidate(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn set_status_overwrites() {
  let s = store().await;
  let record = s.insert_candidate(candidate("Ana")).await.unwrap();

  s.set_status(record.candidate_id, CandidateStatus::Hired(Department::Sociales))
    .await
    .unwrap();
  let fetched = s.get_candidate(record.candidate_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, CandidateStatus::Hired(Department::Sociales));
}

#[tokio::test]
async fn set_status_missing_is_not_found() {
  let s = store().await;
  let id = Uuid::new_v4();
  let err = s.set_status(id, CandidateStatus::Discarded).await.unwrap_err();
  assert!(matches!(err, Error::CandidateNotFound(got) if got == id));
}

#[tokio::test]
async fn legacy_rows_decode() {
  let s = store().await;
  s.execute_raw(
    "INSERT INTO candidates (candidate_id, given_names, status, created_at) VALUES
       ('00000000-0000-4000-8000-000000000001', 'Sin estado', NULL,
        '2024-01-01T00:00:00.000000Z'),
       ('00000000-0000-4000-8000-000000000002', 'Postulada', 'Postulado',
        '2024-01-02T00:00:00.000000Z');",
  )
  .await
  .unwrap();

  let batch = s.fetch_batch(None, 10).await.unwrap();
  assert_eq!(batch.len(), 2);
  assert!(batch.iter().all(|r| r.status.is_active()));
  assert_eq!(batch[0].given_names.as_deref(), Some("Postulada"));
  assert_eq!(batch[1].paternal_surname, None);
  assert_eq!(batch[1].age(chrono::Utc::now()), "");
}

#[tokio::test]
async fn undecodable_fields_do_not_hide_active_candidates() {
  let s = store().await;
  seed(&s, 5).await;
  s.execute_raw(
    "INSERT INTO candidates (candidate_id, given_names, birth_date, status, created_at) VALUES
       ('00000000-0000-4000-8000-000000000003', 'Finanzas', NULL, 'Finanzas',
        '2999-01-02T00:00:00.000000Z'),
       ('00000000-0000-4000-8000-000000000004', 'Fecha rara', '15/06/1995', NULL,
        '2999-01-01T00:00:00.000000Z');",
  )
  .await
  .unwrap();

  let mut wf = ReviewWorkflow::new(PageConfig::default());
  wf.show_active_pool(&s).await;
  assert_eq!(wf.error(), None);
  assert_eq!(wf.page().records.len(), 6);
  assert!(wf.page().records.iter().all(|r| r.status.is_active()));

  let odd_date = &wf.page().records[0];
  assert_eq!(odd_date.given_names.as_deref(), Some("Fecha rara"));
  assert_eq!(odd_date.birth_date, None);

  for d in Department::all() {
    wf.select_department(&s, d).await;
    assert_eq!(wf.error(), None);
    assert!(wf.page().records.is_empty());
  }

  let unknown = Uuid::parse_str("00000000-0000-4000-8000-000000000003").unwrap();
  let record = s.get_candidate(unknown).await.unwrap().unwrap();
  assert_eq!(record.status, CandidateStatus::Unrecognized);
  assert!(decide(&s, &record, Decision::Discard).await.is_err());
}

#[tokio::test]
async fn intake_writes_active_as_absent() {
  let s = store().await;
  let rec = s.insert_candidate(candidate("Nueva")).await.unwrap();
  assert_eq!(s.raw_status(rec.candidate_id).await.unwrap(), None);

  s.set_status(rec.candidate_id, CandidateStatus::Discarded).await.unwrap();
  assert_eq!(
    s.raw_status(rec.candidate_id).await.unwrap().as_deref(),
    Some("Eliminado")
  );
}

// ─── Ordered range queries ───────────────────────────────────────────────────

#[tokio::test]
async fn fetch_batch_is_newest_first() {
  let s = store().await;
  let seeded = seed(&s, 5).await;

  let batch = s.fetch_batch(None, 3).await.unwrap();
  let got: Vec<_> = batch.iter().map(|r| r.candidate_id).collect();
  let want: Vec<_> = seeded.iter().rev().take(3).map(|r| r.candidate_id).collect();
  assert_eq!(got, want);
}

#[tokio::test]
async fn fetch_batch_continues_strictly_after_cursor() {
  let s = store().await;
  let seeded = seed(&s, 5).await;

  let first = s.fetch_batch(None, 2).await.unwrap();
  let cursor = Cursor::at(first.last().unwrap());
  let rest = s.fetch_batch(Some(cursor), 10).await.unwrap();

  assert_eq!(rest.len(), 3);
  assert!(rest.iter().all(|r| !first.contains(r)));
  assert_eq!(rest.last().unwrap().candidate_id, seeded[0].candidate_id);

  let end = s
    .fetch_batch(Some(Cursor::at(rest.last().unwrap())), 10)
    .await
    .unwrap();
  assert!(end.is_empty());
}

#[tokio::test]
async fn equal_timestamps_are_ordered_by_key() {
  let s = store().await;
  s.execute_raw(
    "INSERT INTO candidates (candidate_id, created_at) VALUES
       ('00000000-0000-4000-8000-00000000000a', '2024-05-01T00:00:00.000000Z'),
       ('00000000-0000-4000-8000-00000000000b', '2024-05-01T00:00:00.000000Z'),
       ('00000000-0000-4000-8000-00000000000c', '2024-05-01T00:00:00.000000Z');",
  )
  .await
  .unwrap();

  let first = s.fetch_batch(None, 1).await.unwrap();
  assert!(first[0].candidate_id.to_string().ends_with('c'));

  let rest = s
    .fetch_batch(Some(Cursor::at(&first[0])), 10)
    .await
    .unwrap();
  let tails: Vec<_> = rest
    .iter()
    .map(|r| r.candidate_id.to_string().pop().unwrap())
    .collect();
  assert_eq!(tails, ['b', 'a']);
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn discarded_candidate_leaves_every_listing() {
  let s = store().await;
  let config = PageConfig::default();
  seed(&s, 3).await;
  let record = s.insert_candidate(candidate("Nueva")).await.unwrap();

  let page = fetch_page(&s, Listing::ActivePool, None, &config).await.unwrap();
  assert_eq!(page.records.first().map(|r| r.candidate_id), Some(record.candidate_id));

  decide(&s, &record, Decision::Discard).await.unwrap();

  let page = fetch_page(&s, Listing::ActivePool, None, &config).await.unwrap();
  assert!(page.records.iter().all(|r| r.candidate_id != record.candidate_id));
  assert_eq!(page.records.len(), 3);

  for department in Department::all() {
    let page = fetch_page(&s, Listing::Department(department), None, &config)
      .await
      .unwrap();
    assert!(page.records.is_empty());
  }
}

#[tokio::test]
async fn hired_candidate_appears_in_exactly_one_department() {
  let s = store().await;
  let config = PageConfig::default();
  let record = s.insert_candidate(candidate("Ana")).await.unwrap();

  decide(&s, &record, Decision::Hire(Department::Ti)).await.unwrap();

  let ti = fetch_page(&s, Listing::Department(Department::Ti), None, &config)
    .await
    .unwrap();
  let sociales = fetch_page(&s, Listing::Department(Department::Sociales), None, &config)
    .await
    .unwrap();
  assert_eq!(ti.records.len(), 1);
  assert!(sociales.records.is_empty());

  let fresh = s.get_candidate(record.candidate_id).await.unwrap().unwrap();
  assert!(decide(&s, &fresh, Decision::Discard).await.is_err());
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_find_user() {
  let s = store().await;
  let account = s
    .add_user("Ana@Example.com".into(), "$argon2id$stub".into(), Some(Role::Interviewer))
    .await
    .unwrap();

  let found = s.find_user_by_email("ana@example.com").await.unwrap().unwrap();
  assert_eq!(found.user_id, account.user_id);
  assert_eq!(s.get_role(account.user_id).await.unwrap(), Some(Role::Interviewer));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.add_user("boss@example.com".into(), "h".into(), Some(Role::Employer))
    .await
    .unwrap();
  let err = s
    .add_user("BOSS@example.com".into(), "h".into(), None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateEmail(_)));
}

#[tokio::test]
async fn missing_role_and_legacy_spelling() {
  let s = store().await;
  let roleless = s.add_user("x@example.com".into(), "h".into(), None).await.unwrap();
  assert_eq!(s.get_role(roleless.user_id).await.unwrap(), None);
  assert_eq!(s.get_role(Uuid::new_v4()).await.unwrap(), None);

  s.execute_raw(
    "INSERT INTO users (user_id, email, password_hash, role, created_at) VALUES
       ('00000000-0000-4000-8000-0000000000ee', 'old@example.com', 'h', 'empleador',
        '2024-01-01T00:00:00.000000Z');",
  )
  .await
  .unwrap();
  let id = Uuid::parse_str("00000000-0000-4000-8000-0000000000ee").unwrap();
  assert_eq!(s.get_role(id).await.unwrap(), Some(Role::Employer));
}
