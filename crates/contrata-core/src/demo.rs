//! The demo candidate screen.
//!
//! Shows a random person from a public profile service, decorated with
//! made-up skill scores and a recommendation. Nothing here is persisted.

use std::{fmt, future::Future};

use rand_core::RngCore;
use serde::Deserialize;
use strum::{EnumIter, IntoEnumIterator as _};

/// Positions offered by the approve picker.
pub const JOB_POSITIONS: [&str; 4] = [
  "Técnico en Soporte de Sistemas",
  "Analista de Datos",
  "Coordinador de Proyectos Sociales",
  "Trabajador Social Comunitario",
];

const NATIONALITIES: &[(&str, &str)] = &[
  ("AU", "Australia"),
  ("BR", "Brazil"),
  ("CA", "Canada"),
  ("CH", "Switzerland"),
  ("DE", "Germany"),
  ("DK", "Denmark"),
  ("ES", "Spain"),
  ("FI", "Finland"),
  ("FR", "France"),
  ("GB", "United Kingdom"),
  ("IE", "Ireland"),
  ("IN", "India"),
  ("IR", "Iran"),
  ("MX", "Mexico"),
  ("NL", "Netherlands"),
  ("NO", "Norway"),
  ("NZ", "New Zealand"),
  ("TR", "Turkey"),
  ("UA", "Ukraine"),
  ("US", "United States"),
];

/// Country name for a two-letter nationality code; unknown codes pass
/// through unchanged.
pub fn nationality_name(code: &str) -> &str {
  NATIONALITIES
    .iter()
    .find(|(c, _)| c.eq_ignore_ascii_case(code))
    .map_or(code, |(_, name)| name)
}

// ─── Profile wire shape ──────────────────────────────────────────────────────

/// Body of a `GET https://randomuser.me/api/` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomUserResponse {
  pub results: Vec<RandomProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RandomProfile {
  pub name:   PersonName,
  pub gender: String,
  pub nat:    String,
  pub dob:    DateOfBirth,
  #[serde(default)]
  pub email:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonName {
  #[serde(default)]
  pub title: Option<String>,
  pub first: String,
  pub last:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DateOfBirth {
  pub age: u32,
}

// ─── Decoration ──────────────────────────────────────────────────────────────

/// A skill score in tenths, from 1.0 to 10.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SkillScore(u8);

impl SkillScore {
  pub const MIN: Self = Self(10);
  pub const MAX: Self = Self(100);

  pub fn random(rng: &mut impl RngCore) -> Self {
    let span = u32::from(Self::MAX.0 - Self::MIN.0) + 1;
    // span < 256 so the cast cannot truncate
    Self(Self::MIN.0 + (rng.next_u32() % span) as u8)
  }

  pub fn tenths(self) -> u8 { self.0 }
}

impl fmt::Display for SkillScore {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.0 / 10, self.0 % 10)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Recommendation {
  Yes,
  No,
  Prestigious,
}

impl Recommendation {
  pub fn random(rng: &mut impl RngCore) -> Self {
    let all: Vec<_> = Self::iter().collect();
    all[rng.next_u32() as usize % all.len()]
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Yes => "Sí",
      Self::No => "No",
      Self::Prestigious => "Prestigiosa",
    }
  }
}

impl fmt::Display for Recommendation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoCandidate {
  pub profile:         RandomProfile,
  pub skill_technical: SkillScore,
  pub skill_social:    SkillScore,
  pub recommendation:  Recommendation,
}

impl DemoCandidate {
  pub fn decorate(profile: RandomProfile, rng: &mut impl RngCore) -> Self {
    Self {
      profile,
      skill_technical: SkillScore::random(rng),
      skill_social: SkillScore::random(rng),
      recommendation: Recommendation::random(rng),
    }
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.profile.name.first, self.profile.name.last)
  }

  pub fn nationality(&self) -> &str { nationality_name(&self.profile.nat) }
}

// ─── Screen state ────────────────────────────────────────────────────────────

/// Where demo profiles come from.
pub trait ProfileSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn next_profile(
    &self,
  ) -> impl Future<Output = Result<RandomProfile, Self::Error>> + Send + '_;
}

#[derive(Debug, Default)]
pub struct DemoScreen {
  current:         Option<DemoCandidate>,
  picker_open:     bool,
  last_assignment: Option<String>,
  error:           Option<String>,
}

impl DemoScreen {
  pub fn new() -> Self { Self::default() }

  pub fn current(&self) -> Option<&DemoCandidate> { self.current.as_ref() }
  pub fn picker_open(&self) -> bool { self.picker_open }
  pub fn last_assignment(&self) -> Option<&str> { self.last_assignment.as_deref() }
  pub fn error(&self) -> Option<&str> { self.error.as_deref() }

  /// Replace the shown candidate with a freshly fetched one. On failure the
  /// previous candidate stays and the error is recorded.
  pub async fn advance<P: ProfileSource>(&mut self, source: &P, rng: &mut impl RngCore) {
    match source.next_profile().await {
      Ok(profile) => {
        self.current = Some(DemoCandidate::decorate(profile, rng));
        self.error = None;
      }
      Err(e) => {
        tracing::warn!(error = %e, "could not fetch demo profile");
        self.error = Some(e.to_string());
      }
    }
  }

  pub async fn discard<P: ProfileSource>(&mut self, source: &P, rng: &mut impl RngCore) {
    self.picker_open = false;
    self.advance(source, rng).await;
  }

  pub fn open_picker(&mut self) {
    if self.current.is_some() {
      self.picker_open = true;
    }
  }

  pub fn close_picker(&mut self) { self.picker_open = false; }

  /// Assign the shown candidate to `JOB_POSITIONS[index]` and move on.
  /// Returns the chosen position, or `None` if the picker was not open or
  /// the index is out of range.
  pub async fn approve<P: ProfileSource>(
    &mut self,
    index: usize,
    source: &P,
    rng: &mut impl RngCore,
  ) -> Option<&'static str> {
    if !self.picker_open {
      return None;
    }
    let position = *JOB_POSITIONS.get(index)?;
    self.picker_open = false;
    self.last_assignment = Some(format!("Se asignó el puesto: {position}"));
    tracing::info!(position, "demo candidate approved");
    self.advance(source, rng).await;
    Some(position)
  }

  pub fn dismiss_message(&mut self) {
    self.last_assignment = None;
    self.error = None;
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

  use super::*;

  /// Deterministic counter-based generator.
  struct Counter(u32);

  impl RngCore for Counter {
    fn next_u32(&mut self) -> u32 {
      self.0 = self.0.wrapping_add(1);
      self.0
    }

    fn next_u64(&mut self) -> u64 { u64::from(self.next_u32()) }

    fn fill_bytes(&mut self, dest: &mut [u8]) { rand_core::impls::fill_bytes_via_next(self, dest) }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
      self.fill_bytes(dest);
      Ok(())
    }
  }

  #[derive(Debug, thiserror::Error)]
  #[error("profile service unavailable")]
  struct Offline;

  #[derive(Default)]
  struct FakeSource {
    served: AtomicU32,
    down:   AtomicBool,
  }

  impl ProfileSource for FakeSource {
    type Error = Offline;

    async fn next_profile(&self) -> Result<RandomProfile, Offline> {
      if self.down.load(Ordering::SeqCst) {
        return Err(Offline);
      }
      let n = self.served.fetch_add(1, Ordering::SeqCst);
      Ok(RandomProfile {
        name:   PersonName { title: None, first: format!("Persona{n}"), last: "Prueba".into() },
        gender: "female".into(),
        nat:    "MX".into(),
        dob:    DateOfBirth { age: 30 },
        email:  None,
      })
    }
  }

  #[test]
  fn scores_stay_in_range() {
    let mut rng = Counter(0);
    for _ in 0..500 {
      let s = SkillScore::random(&mut rng);
      assert!((SkillScore::MIN..=SkillScore::MAX).contains(&s), "{s}");
    }
    assert_eq!(SkillScore(10).to_string(), "1.0");
    assert_eq!(SkillScore(100).to_string(), "10.0");
    assert_eq!(SkillScore(47).to_string(), "4.7");
  }

  #[test]
  fn nationality_lookup() {
    assert_eq!(nationality_name("GB"), "United Kingdom");
    assert_eq!(nationality_name("mx"), "Mexico");
    assert_eq!(nationality_name("CL"), "CL");
  }

  #[test]
  fn parses_random_user_payload() {
    let body = r#"{
      "results": [{
        "gender": "male",
        "name": { "title": "Mr", "first": "Ilmari", "last": "Lampi" },
        "email": "ilmari.lampi@example.com",
        "dob": { "date": "1961-05-02T09:51:32.317Z", "age": 63 },
        "nat": "FI",
        "picture": { "large": "https://randomuser.me/api/portraits/men/1.jpg" }
      }],
      "info": { "seed": "abc", "results": 1, "page": 1, "version": "1.4" }
    }"#;
    let resp: RandomUserResponse = serde_json::from_str(body).unwrap();
    let profile = &resp.results[0];
    assert_eq!(profile.name.first, "Ilmari");
    assert_eq!(profile.dob.age, 63);
    assert_eq!(nationality_name(&profile.nat), "Finland");
  }

  #[tokio::test]
  async fn approve_assigns_and_advances() {
    let source = FakeSource::default();
    let mut rng = Counter(7);
    let mut screen = DemoScreen::new();

    screen.advance(&source, &mut rng).await;
    assert_eq!(screen.current().unwrap().full_name(), "Persona0 Prueba");

    assert_eq!(screen.approve(1, &source, &mut rng).await, None);

    screen.open_picker();
    assert_eq!(screen.approve(9, &source, &mut rng).await, None);
    assert!(screen.picker_open());

    assert_eq!(screen.approve(1, &source, &mut rng).await, Some("Analista de Datos"));
    assert!(!screen.picker_open());
    assert_eq!(screen.last_assignment(), Some("Se asignó el puesto: Analista de Datos"));
    assert_eq!(screen.current().unwrap().full_name(), "Persona1 Prueba");
  }

  #[tokio::test]
  async fn failed_fetch_keeps_current() {
    let source = FakeSource::default();
    let mut rng = Counter(0);
    let mut screen = DemoScreen::new();
    screen.advance(&source, &mut rng).await;

    source.down.store(true, Ordering::SeqCst);
    screen.discard(&source, &mut rng).await;
    assert_eq!(screen.current().unwrap().full_name(), "Persona0 Prueba");
    assert_eq!(screen.error(), Some("profile service unavailable"));

    screen.dismiss_message();
    assert!(screen.error().is_none());
  }
}
