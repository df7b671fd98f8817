//! Per-pass counters returned by the seed pipeline.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
  /// The collection was supplied and every record was attempted.
  Seeded,
  /// The collection was not supplied; nothing was attempted.
  Missing,
}

/// Counters for one seed pass.
///
/// `seeded`/`failed` count top-level records; `linked`/`unlinked` count the
/// nested link declarations (requirements, resource skills) or, for career
/// paths, the edges themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
  pub status:   PassStatus,
  pub seeded:   usize,
  pub failed:   usize,
  pub linked:   usize,
  pub unlinked: usize,
}

impl PassReport {
  pub fn missing() -> Self { Self::with_status(PassStatus::Missing) }

  pub fn started() -> Self { Self::with_status(PassStatus::Seeded) }

  fn with_status(status: PassStatus) -> Self {
    Self { status, seeded: 0, failed: 0, linked: 0, unlinked: 0 }
  }

  pub fn is_missing(&self) -> bool { self.status == PassStatus::Missing }
}

impl fmt::Display for PassReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.status {
      PassStatus::Missing => f.write_str("not supplied"),
      PassStatus::Seeded => write!(
        f,
        "{} seeded, {} failed, {} linked, {} not linked",
        self.seeded, self.failed, self.linked, self.unlinked
      ),
    }
  }
}

/// Summary of a full pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
  pub skills:       PassReport,
  pub roles:        PassReport,
  pub resources:    PassReport,
  pub career_paths: PassReport,
}
