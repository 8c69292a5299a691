//! Async HTTP clients: the Contrata JSON API and the random profile service.
//!
//! [`ApiClient`] implements [`CandidateStore`] and [`IdentityProvider`], so
//! the core workflows drive the server exactly as they would a local store.

use std::{
  sync::{PoisonError, RwLock},
  time::Duration,
};

use chrono::SecondsFormat;
use contrata_core::{
  candidate::{CandidateRecord, CandidateStatus, NewCandidate},
  demo::{ProfileSource, RandomProfile, RandomUserResponse},
  identity::{IdentityProvider, Role},
  review::PageConfig,
  store::{CandidateStore, Cursor},
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Public endpoint for demo profiles.
pub const RANDOM_USER_URL: &str = "https://randomuser.me/api/";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{path} → {status}: {message}")]
  Status {
    path:    String,
    status:  StatusCode,
    message: String,
  },

  #[error("the profile service returned no results")]
  EmptyProfile,
}

/// Turn a non-success response into [`ClientError::Status`], keeping the
/// server's `{"error": …}` message when there is one.
async fn check(path: &str, resp: Response) -> Result<Response, ClientError> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = resp
    .json::<serde_json::Value>()
    .await
    .ok()
    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
    .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_owned());
  Err(ClientError::Status { path: path.to_owned(), status, message })
}

fn http_client() -> Result<Client, ClientError> {
  Ok(Client::builder().timeout(Duration::from_secs(30)).build()?)
}

// ─── Contrata API ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SignInResponse {
  user_id: Uuid,
  token:   String,
}

#[derive(Deserialize)]
struct RoleResponse {
  role: Role,
}

#[derive(Serialize)]
struct StatusBody {
  status: CandidateStatus,
}

/// Async HTTP client for the Contrata JSON API.
///
/// Holds the bearer token of the current sign-in, if any.
pub struct ApiClient {
  client:   Client,
  base_url: String,
  token:    RwLock<Option<String>>,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    Ok(Self {
      client:   http_client()?,
      base_url: base_url.into(),
      token:    RwLock::new(None),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    let token = self.token.read().unwrap_or_else(PoisonError::into_inner).clone();
    match token {
      Some(t) => req.bearer_auth(t),
      None => req,
    }
  }

  fn set_token(&self, token: Option<String>) {
    *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
  }

  /// `GET /api/review/config`
  pub async fn review_config(&self) -> Result<PageConfig, ClientError> {
    let path = "/review/config";
    let resp = self.auth(self.client.get(self.url(path))).send().await?;
    Ok(check(path, resp).await?.json().await?)
  }

  /// `POST /api/auth/sign-out`; the local token is dropped either way.
  pub async fn sign_out(&self) -> Result<(), ClientError> {
    let path = "/auth/sign-out";
    let resp = self.auth(self.client.post(self.url(path))).send().await;
    self.set_token(None);
    check(path, resp?).await?;
    Ok(())
  }
}

impl CandidateStore for ApiClient {
  type Error = ClientError;

  async fn insert_candidate(&self, input: NewCandidate) -> Result<CandidateRecord, ClientError> {
    let path = "/candidates";
    let resp = self
      .auth(self.client.post(self.url(path)))
      .json(&input)
      .send()
      .await?;
    Ok(check(path, resp).await?.json().await?)
  }

  async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateRecord>, ClientError> {
    let path = format!("/candidates/{id}");
    let resp = self.auth(self.client.get(self.url(&path))).send().await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    Ok(Some(check(&path, resp).await?.json().await?))
  }

  async fn set_status(&self, id: Uuid, status: CandidateStatus) -> Result<(), ClientError> {
    let path = format!("/candidates/{id}/status");
    let resp = self
      .auth(self.client.put(self.url(&path)))
      .json(&StatusBody { status })
      .send()
      .await?;
    check(&path, resp).await?;
    Ok(())
  }

  async fn fetch_batch(
    &self,
    after: Option<Cursor>,
    limit: usize,
  ) -> Result<Vec<CandidateRecord>, ClientError> {
    let path = "/candidates";
    let mut query = vec![("limit", limit.to_string())];
    if let Some(c) = after {
      query.push(("after_created", c.created_at.to_rfc3339_opts(SecondsFormat::Micros, true)));
      query.push(("after_id", c.candidate_id.to_string()));
    }
    let resp = self
      .auth(self.client.get(self.url(path)))
      .query(&query)
      .send()
      .await?;
    Ok(check(path, resp).await?.json().await?)
  }
}

impl IdentityProvider for ApiClient {
  type Error = ClientError;

  async fn sign_in(&self, email: &str, password: &str) -> Result<Option<Uuid>, ClientError> {
    let path = "/auth/sign-in";
    let resp = self
      .client
      .post(self.url(path))
      .json(&json!({ "email": email, "password": password }))
      .send()
      .await?;
    if resp.status() == StatusCode::UNAUTHORIZED {
      return Ok(None);
    }
    let body: SignInResponse = check(path, resp).await?.json().await?;
    self.set_token(Some(body.token));
    Ok(Some(body.user_id))
  }

  async fn role_of(&self, user_id: Uuid) -> Result<Option<Role>, ClientError> {
    let path = format!("/users/{user_id}/role");
    let resp = self.auth(self.client.get(self.url(&path))).send().await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let body: RoleResponse = check(&path, resp).await?.json().await?;
    Ok(Some(body.role))
  }
}

// ─── Random profiles ─────────────────────────────────────────────────────────

/// Fetches demo profiles from randomuser.me.
pub struct RandomUserClient {
  client: Client,
  url:    String,
}

impl RandomUserClient {
  pub fn new(url: impl Into<String>) -> Result<Self, ClientError> {
    Ok(Self { client: http_client()?, url: url.into() })
  }
}

impl ProfileSource for RandomUserClient {
  type Error = ClientError;

  async fn next_profile(&self) -> Result<RandomProfile, ClientError> {
    let resp = self.client.get(&self.url).send().await?;
    let body: RandomUserResponse = check(&self.url, resp).await?.json().await?;
    body.results.into_iter().next().ok_or(ClientError::EmptyProfile)
  }
}
