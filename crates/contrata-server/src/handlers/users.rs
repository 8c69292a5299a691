//! Handlers for `/api/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/users/{id}/role` | Callers may only read their own role; 404 if none |

use axum::{Json, extract::State};
use contrata_core::identity::{Role, UserDirectory as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, Backend, auth::Authenticated, error::ApiError, extract::ApiPath};

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleResponse {
  pub role: Role,
}

/// `GET /api/users/{id}/role`
pub async fn role<S: Backend>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<RoleResponse>, ApiError> {
  if caller.session.user_id != id {
    return Err(ApiError::Forbidden);
  }
  let role = state
    .store
    .get_role(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("no role for user {id}")))?;
  Ok(Json(RoleResponse { role }))
}
