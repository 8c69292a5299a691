//! Handlers for `/api/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/auth/sign-in` | Body: `{"email","password"}`; 401 on bad credentials |
//! | `POST` | `/api/auth/sign-out` | Drops the caller's session; 204 |

use axum::{Json, extract::State, http::StatusCode};
use contrata_core::identity::IdentityProvider as _;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState, Backend,
  auth::{AuthSession, Authenticated, PasswordIdentity},
  error::ApiError,
  extract::ApiJson,
};

// ─── Sign in ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignInBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignInResponse {
  pub user_id: Uuid,
  pub token:   String,
}

/// `POST /api/auth/sign-in`
pub async fn sign_in<S: Backend>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<SignInBody>,
) -> Result<Json<SignInResponse>, ApiError> {
  let email = body.email.trim();
  if email.is_empty() || body.password.is_empty() {
    return Err(contrata_core::Error::MissingCredentials.into());
  }

  let identity = PasswordIdentity(&*state.store);
  let Some(user_id) = identity
    .sign_in(email, &body.password)
    .await
    .map_err(ApiError::store)?
  else {
    tracing::info!(email, "sign-in rejected");
    return Err(ApiError::InvalidCredentials);
  };
  let role = identity.role_of(user_id).await.map_err(ApiError::store)?;

  let token = state
    .sessions
    .issue(AuthSession { user_id, email: email.to_owned(), role })
    .await;
  tracing::info!(%user_id, ?role, "signed in");
  Ok(Json(SignInResponse { user_id, token }))
}

// ─── Sign out ────────────────────────────────────────────────────────────────

/// `POST /api/auth/sign-out`
pub async fn sign_out<S: Backend>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
) -> StatusCode {
  state.sessions.revoke(&caller.token).await;
  tracing::info!(user_id = %caller.session.user_id, "signed out");
  StatusCode::NO_CONTENT
}
