//! Candidate review: status-filtered pagination and terminal transitions.
//!
//! The store can only return records in creation order after a cursor, so a
//! listing over-fetches a raw batch, keeps the records that belong to it, and
//! shows the first `page_size` survivors. The next cursor always sits on the
//! last *raw* record of the batch, however many survived. A batch dominated
//! by decided records can therefore under-fill a page or skip ahead; that is
//! accepted.
//!
//! There is no backward pagination: "previous" re-derives page 1.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  candidate::{CandidateRecord, CandidateStatus, Department},
  store::{CandidateStore, Cursor},
};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_OVERFETCH: usize = 20;

// ─── Configuration ───────────────────────────────────────────────────────────

/// How a page decides whether another one may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoreHeuristic {
  /// More than `page_size` records survived the filter.
  #[default]
  SurvivorOverflow,
  /// The raw batch came back full, so the collection may continue.
  RawBatchFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
  pub page_size: usize,
  /// Raw records requested per fetch; should be at least `page_size`.
  pub overfetch: usize,
  #[serde(default)]
  pub heuristic: MoreHeuristic,
}

impl Default for PageConfig {
  fn default() -> Self {
    Self {
      page_size: DEFAULT_PAGE_SIZE,
      overfetch: DEFAULT_OVERFETCH,
      heuristic: MoreHeuristic::default(),
    }
  }
}

// ─── Listings and pages ──────────────────────────────────────────────────────

/// Which records a listing keeps after the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
  /// Candidates still awaiting a decision.
  ActivePool,
  /// Candidates hired into one department.
  Department(Department),
}

impl Listing {
  pub fn admits(&self, record: &CandidateRecord) -> bool {
    match self {
      Self::ActivePool => record.status.is_active(),
      Self::Department(d) => record.status == CandidateStatus::Hired(*d),
    }
  }
}

/// One visible page of a listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
  pub records:     Vec<CandidateRecord>,
  /// Position of the last raw record fetched; `None` when the batch was empty.
  pub next_cursor: Option<Cursor>,
  pub has_more:    bool,
  /// Whether the raw batch was exactly `overfetch` long.
  pub raw_full:    bool,
}

/// Filter a raw batch down to a page.
pub fn assemble_page(
  listing: Listing,
  raw: Vec<CandidateRecord>,
  config: &PageConfig,
) -> Page {
  let raw_full = raw.len() == config.overfetch;
  let next_cursor = raw.last().map(Cursor::at);

  let mut survivors: Vec<_> = raw.into_iter().filter(|r| listing.admits(r)).collect();
  let overflow = survivors.len() > config.page_size;
  survivors.truncate(config.page_size);

  let has_more = match config.heuristic {
    MoreHeuristic::SurvivorOverflow => overflow,
    MoreHeuristic::RawBatchFull => raw_full,
  };

  Page { records: survivors, next_cursor, has_more, raw_full }
}

/// Fetch one raw batch after `after` and assemble it.
pub async fn fetch_page<S: CandidateStore>(
  store: &S,
  listing: Listing,
  after: Option<Cursor>,
  config: &PageConfig,
) -> Result<Page> {
  let raw = store
    .fetch_batch(after, config.overfetch)
    .await
    .map_err(Error::store)?;
  let fetched = raw.len();
  let page = assemble_page(listing, raw, config);
  tracing::debug!(
    ?listing,
    fetched,
    kept = page.records.len(),
    has_more = page.has_more,
    "assembled page"
  );
  Ok(page)
}

// ─── Transitions ─────────────────────────────────────────────────────────────

/// The two terminal decisions an operator can take on an active candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Discard,
  Hire(Department),
}

impl Decision {
  pub fn target(self) -> CandidateStatus {
    match self {
      Self::Discard => CandidateStatus::Discarded,
      Self::Hire(d) => CandidateStatus::Hired(d),
    }
  }

  /// The decision that writes `status`; `None` for [`CandidateStatus::Active`]
  /// and [`CandidateStatus::Unrecognized`], which no decision leads to.
  pub fn for_target(status: CandidateStatus) -> Option<Self> {
    match status {
      CandidateStatus::Active | CandidateStatus::Unrecognized => None,
      CandidateStatus::Discarded => Some(Self::Discard),
      CandidateStatus::Hired(d) => Some(Self::Hire(d)),
    }
  }
}

/// Write the decision for `record`, which must still be active as fetched.
///
/// Not guarded against a concurrent operator: the write is last-write-wins.
pub async fn decide<S: CandidateStore>(
  store: &S,
  record: &CandidateRecord,
  decision: Decision,
) -> Result<CandidateStatus> {
  if !record.status.is_active() {
    return Err(Error::NotActionable {
      id:     record.candidate_id,
      status: record.status,
    });
  }
  let target = decision.target();
  store
    .set_status(record.candidate_id, target)
    .await
    .map_err(Error::store)?;
  tracing::info!(candidate_id = %record.candidate_id, status = %target, "candidate decided");
  Ok(target)
}

// ─── Workflow state ──────────────────────────────────────────────────────────

/// Which half of the review screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewView {
  ActivePool,
  /// The department view; `None` until a department is picked.
  Departments(Option<Department>),
}

impl ReviewView {
  pub fn listing(self) -> Option<Listing> {
    match self {
      Self::ActivePool => Some(Listing::ActivePool),
      Self::Departments(d) => d.map(Listing::Department),
    }
  }
}

/// An opened profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
  pub record:      CandidateRecord,
  /// The department chooser for a hire is showing.
  pub hire_picker: bool,
}

impl Profile {
  /// Transitions are offered only for active candidates.
  pub fn actions_available(&self) -> bool { self.record.status.is_active() }
}

/// Identifies one in-flight fetch. A completion whose ticket is no longer
/// current is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
  generation: u64,
  pub listing: Listing,
  pub after:   Option<Cursor>,
  reset:       bool,
}

/// State of the review screen, driven by operator actions.
#[derive(Debug)]
pub struct ReviewWorkflow {
  config:      PageConfig,
  view:        ReviewView,
  page:        Page,
  page_number: usize,
  generation:  u64,
  loading:     bool,
  error:       Option<String>,
  profile:     Option<Profile>,
}

impl ReviewWorkflow {
  pub fn new(config: PageConfig) -> Self {
    Self {
      config,
      view: ReviewView::ActivePool,
      page: Page::default(),
      page_number: 1,
      generation: 0,
      loading: false,
      error: None,
      profile: None,
    }
  }

  // ── Accessors ────────────────────────────────────────────────────────────

  pub fn config(&self) -> &PageConfig { &self.config }

  pub fn view(&self) -> ReviewView { self.view }

  pub fn page(&self) -> &Page { &self.page }

  pub fn page_number(&self) -> usize { self.page_number }

  pub fn is_loading(&self) -> bool { self.loading }

  pub fn error(&self) -> Option<&str> { self.error.as_deref() }

  pub fn profile(&self) -> Option<&Profile> { self.profile.as_ref() }

  pub fn can_go_back(&self) -> bool { self.page_number > 1 }

  pub fn can_go_forward(&self) -> bool { self.page.has_more }

  // ── Fetch protocol ───────────────────────────────────────────────────────

  /// Start a fetch for the current listing. `reset` starts again from the
  /// newest record; otherwise the fetch continues after the current page.
  ///
  /// Any fetch started earlier becomes stale.
  pub fn begin_fetch(&mut self, reset: bool) -> Option<FetchTicket> {
    let listing = self.view.listing()?;
    self.generation += 1;
    self.loading = true;
    Some(FetchTicket {
      generation: self.generation,
      listing,
      after: if reset { None } else { self.page.next_cursor },
      reset,
    })
  }

  /// Apply the outcome of a fetch. Returns `false` if the ticket was stale
  /// and the outcome was discarded.
  pub fn complete_fetch(
    &mut self,
    ticket: FetchTicket,
    outcome: Result<Vec<CandidateRecord>>,
  ) -> bool {
    if ticket.generation != self.generation {
      tracing::debug!(?ticket, current = self.generation, "dropping stale fetch");
      return false;
    }
    self.loading = false;
    match outcome {
      Ok(raw) => {
        self.page = assemble_page(ticket.listing, raw, &self.config);
        self.page_number = if ticket.reset { 1 } else { self.page_number + 1 };
        self.error = None;
      }
      Err(e) => {
        tracing::warn!(error = %e, "candidate fetch failed");
        self.error = Some(e.to_string());
      }
    }
    true
  }

  async fn load<S: CandidateStore>(&mut self, store: &S, reset: bool) -> bool {
    let Some(ticket) = self.begin_fetch(reset) else {
      return false;
    };
    let outcome = store
      .fetch_batch(ticket.after, self.config.overfetch)
      .await
      .map_err(Error::store);
    self.complete_fetch(ticket, outcome)
  }

  // ── Navigation ───────────────────────────────────────────────────────────

  /// Switch to (or refresh) the active pool, starting from page 1.
  pub async fn show_active_pool<S: CandidateStore>(&mut self, store: &S) {
    self.view = ReviewView::ActivePool;
    self.profile = None;
    self.load(store, true).await;
  }

  /// Switch to the department view with no department picked.
  pub fn show_departments(&mut self) {
    self.view = ReviewView::Departments(None);
    self.profile = None;
    self.page = Page::default();
    self.page_number = 1;
    self.generation += 1;
    self.loading = false;
  }

  /// Pick a department; cursor and page start over.
  pub async fn select_department<S: CandidateStore>(
    &mut self,
    store: &S,
    department: Department,
  ) {
    self.view = ReviewView::Departments(Some(department));
    self.profile = None;
    self.page = Page::default();
    self.load(store, true).await;
  }

  /// Continue after the current page. No-op when no more pages are expected.
  pub async fn next_page<S: CandidateStore>(&mut self, store: &S) -> bool {
    if !self.can_go_forward() {
      return false;
    }
    self.load(store, false).await
  }

  /// Go back to page 1.
  pub async fn previous_page<S: CandidateStore>(&mut self, store: &S) -> bool {
    if !self.can_go_back() {
      return false;
    }
    self.load(store, true).await
  }

  pub fn dismiss_error(&mut self) { self.error = None; }

  // ── Profiles ─────────────────────────────────────────────────────────────

  /// Open the profile of the `index`th record on the page.
  pub fn open_profile(&mut self, index: usize) -> Option<&Profile> {
    let record = self.page.records.get(index)?.clone();
    self.profile = Some(Profile { record, hire_picker: false });
    self.profile.as_ref()
  }

  pub fn close_profile(&mut self) { self.profile = None; }

  /// Show the department chooser; refused for read-only profiles.
  pub fn open_hire_picker(&mut self) -> bool {
    match &mut self.profile {
      Some(p) if p.actions_available() => {
        p.hire_picker = true;
        true
      }
      _ => false,
    }
  }

  pub fn close_hire_picker(&mut self) {
    if let Some(p) = &mut self.profile {
      p.hire_picker = false;
    }
  }

  /// Discard the open profile's candidate.
  pub async fn discard<S: CandidateStore>(&mut self, store: &S) -> Result<CandidateStatus> {
    self.apply(store, Decision::Discard).await
  }

  /// Hire the open profile's candidate into `department`.
  pub async fn hire<S: CandidateStore>(
    &mut self,
    store: &S,
    department: Department,
  ) -> Result<CandidateStatus> {
    self.apply(store, Decision::Hire(department)).await
  }

  /// On success the profile closes and the active pool is re-fetched from
  /// page 1. On failure the profile stays open and the error is recorded.
  async fn apply<S: CandidateStore>(
    &mut self,
    store: &S,
    decision: Decision,
  ) -> Result<CandidateStatus> {
    let record = self
      .profile
      .as_ref()
      .map(|p| p.record.clone())
      .ok_or(Error::NoProfileOpen)?;

    match decide(store, &record, decision).await {
      Ok(status) => {
        self.show_active_pool(store).await;
        Ok(status)
      }
      Err(e) => {
        self.error = Some(e.to_string());
        Err(e)
      }
    }
  }
}

impl Default for ReviewWorkflow {
  fn default() -> Self { Self::new(PageConfig::default()) }
}
