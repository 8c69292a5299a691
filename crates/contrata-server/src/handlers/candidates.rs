//! Handlers for `/api/candidates` and `/api/review` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/review/config` | Page size, overfetch, and heuristic for clients |
//! | `GET`  | `/api/candidates` | `?limit&after_created&after_id`; raw ordered batch |
//! | `POST` | `/api/candidates` | Body: [`NewCandidate`]; 201 + record |
//! | `GET`  | `/api/candidates/{id}` | 404 if not found |
//! | `PUT`  | `/api/candidates/{id}/status` | Body: `{"status": …}`; 204 |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use contrata_core::{
  candidate::{CandidateRecord, CandidateStatus, NewCandidate},
  identity::Role,
  review::{Decision, PageConfig, decide},
  store::{CandidateStore as _, Cursor},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState, Backend,
  auth::Authenticated,
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
};

/// Upper bound on `limit` for a single batch.
pub const MAX_BATCH: usize = 200;

// ─── Review config ───────────────────────────────────────────────────────────

/// `GET /api/review/config`
pub async fn review_config<S: Backend>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
) -> Result<Json<PageConfig>, ApiError> {
  caller.require(Role::Employer)?;
  Ok(Json(state.config.page_config()))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListParams {
  pub limit:         Option<usize>,
  pub after_created: Option<DateTime<Utc>>,
  pub after_id:      Option<Uuid>,
}

impl ListParams {
  pub fn cursor(&self) -> Result<Option<Cursor>, ApiError> {
    match (self.after_created, self.after_id) {
      (None, None) => Ok(None),
      (Some(created_at), Some(candidate_id)) => Ok(Some(Cursor { created_at, candidate_id })),
      _ => Err(ApiError::BadRequest(
        "after_created and after_id must be given together".into(),
      )),
    }
  }
}

/// `GET /api/candidates[?limit=&after_created=&after_id=]`
pub async fn list<S: Backend>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<CandidateRecord>>, ApiError> {
  caller.require(Role::Employer)?;
  let after = params.cursor()?;
  let limit = params
    .limit
    .unwrap_or_else(|| state.config.page_config().overfetch)
    .min(MAX_BATCH);

  let batch = state
    .store
    .fetch_batch(after, limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(batch))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /api/candidates`
pub async fn create<S: Backend>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  ApiJson(body): ApiJson<NewCandidate>,
) -> Result<impl IntoResponse, ApiError> {
  let session = caller.require(Role::Interviewer)?;
  body.validate()?;

  let record = state
    .store
    .insert_candidate(body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    candidate_id = %record.candidate_id,
    by = %session.user_id,
    "candidate registered"
  );
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

async fn load<S: Backend>(state: &AppState<S>, id: Uuid) -> Result<CandidateRecord, ApiError> {
  state
    .store
    .get_candidate(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("candidate {id} not found")))
}

/// `GET /api/candidates/{id}`
pub async fn get_one<S: Backend>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CandidateRecord>, ApiError> {
  caller.require(Role::Employer)?;
  Ok(Json(load(&state, id).await?))
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusBody {
  pub status: CandidateStatus,
}

/// `PUT /api/candidates/{id}/status`
///
/// Only discard and hire are accepted, and only for a candidate that is
/// still active.
pub async fn set_status<S: Backend>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  ApiPath(id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<StatusBody>,
) -> Result<StatusCode, ApiError> {
  caller.require(Role::Employer)?;
  let decision = Decision::for_target(body.status).ok_or_else(|| {
    ApiError::BadRequest(format!("{} is not a decision", body.status))
  })?;

  let record = load(&state, id).await?;
  decide(&*state.store, &record, decision).await?;
  Ok(StatusCode::NO_CONTENT)
}
