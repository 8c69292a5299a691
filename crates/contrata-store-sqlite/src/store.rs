//! [`SqliteStore`]: the SQLite implementation of [`CandidateStore`] and
//! [`UserDirectory`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use contrata_core::{
  candidate::{CandidateRecord, CandidateStatus, NewCandidate},
  identity::{Role, UserAccount, UserDirectory},
  store::{CandidateStore, Cursor},
};

use crate::{
  Error, Result,
  encode::{
    CANDIDATE_COLUMNS, RawCandidate, RawUser, encode_date, encode_dt, encode_status, encode_uuid,
    now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Candidate and user collections backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL, for seeding rows the typed API cannot produce.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The stored status column of a candidate, undecoded.
  #[cfg(test)]
  pub(crate) async fn raw_status(&self, id: Uuid) -> Result<Option<String>> {
    let id_str = encode_uuid(id);
    let status = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT status FROM candidates WHERE candidate_id = ?1",
          rusqlite::params![id_str],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(status)
  }
}

// ─── CandidateStore impl ─────────────────────────────────────────────────────

impl CandidateStore for SqliteStore {
  type Error = Error;

  async fn insert_candidate(&self, input: NewCandidate) -> Result<CandidateRecord> {
    let record = input.into_record(Uuid::new_v4(), now());

    let id_str     = encode_uuid(record.candidate_id);
    let birth_str  = record.birth_date.map(encode_date);
    let status_str = encode_status(record.status);
    let at_str     = encode_dt(record.created_at);
    let row = record.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO candidates (
             candidate_id, paternal_surname, maternal_surname, given_names,
             birth_date, experience, education, languages, notes, phone,
             status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            id_str,
            row.paternal_surname,
            row.maternal_surname,
            row.given_names,
            birth_str,
            row.experience,
            row.education,
            row.languages,
            row.notes,
            row.phone,
            status_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(candidate_id = %record.candidate_id, "inserted candidate");
    Ok(record)
  }

  async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCandidate> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE candidate_id = ?1"),
              rusqlite::params![id_str],
              RawCandidate::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCandidate::into_record).transpose()
  }

  async fn set_status(&self, id: Uuid, status: CandidateStatus) -> Result<()> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE candidates SET status = ?2 WHERE candidate_id = ?1",
          rusqlite::params![id_str, status_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::CandidateNotFound(id));
    }
    tracing::debug!(candidate_id = %id, %status, "status updated");
    Ok(())
  }

  async fn fetch_batch(
    &self,
    after: Option<Cursor>,
    limit: usize,
  ) -> Result<Vec<CandidateRecord>> {
    let after_at = after.map(|c| encode_dt(c.created_at));
    let after_id = after.map(|c| encode_uuid(c.candidate_id));
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawCandidate> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CANDIDATE_COLUMNS} FROM candidates
           WHERE ?1 IS NULL
              OR created_at < ?1
              OR (created_at = ?1 AND candidate_id < ?2)
           ORDER BY created_at DESC, candidate_id DESC
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![after_at, after_id, limit],
            RawCandidate::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCandidate::into_record).collect()
  }
}

// ─── UserDirectory impl ──────────────────────────────────────────────────────

const USER_COLUMNS: &str = "user_id, email, password_hash, role, created_at";

impl UserDirectory for SqliteStore {
  type Error = Error;

  async fn add_user(
    &self,
    email: String,
    password_hash: String,
    role: Option<Role>,
  ) -> Result<UserAccount> {
    let account = UserAccount {
      user_id: Uuid::new_v4(),
      email: email.trim().to_owned(),
      password_hash,
      role,
      created_at: now(),
    };

    let id_str   = encode_uuid(account.user_id);
    let email    = account.email.clone();
    let hash     = account.password_hash.clone();
    let role_str = role.map(Role::as_str);
    let at_str   = encode_dt(account.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(false);
        }
        conn.execute(
          "INSERT INTO users (user_id, email, password_hash, role, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, email, hash, role_str, at_str],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::DuplicateEmail(account.email));
    }
    Ok(account)
  }

  async fn find_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<UserAccount>> {
    let email = email.trim().to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
              rusqlite::params![email],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_account).transpose()
  }

  async fn get_role(&self, user_id: Uuid) -> Result<Option<Role>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawUser::into_account).transpose()?.and_then(|u| u.role))
  }
}
