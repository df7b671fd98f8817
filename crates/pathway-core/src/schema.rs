//! Outcome of the best-effort composite-uniqueness migration.

use std::fmt;

/// What happened when the schema manager tried to guarantee
/// `UNIQUE (title, url)` on `learning_resources`.
///
/// Only the two `Skipped*` variants leave the table without an enforced
/// constraint; in that case learning resources are upserted through the
/// fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOutcome {
  /// A matching unique index (or table clause) was already live.
  AlreadyPresent,
  /// The unique index was created by this run.
  Added,
  /// Existing duplicate rows made the index impossible to build.
  SkippedAlreadyViolated,
  /// The index could not be created for any other reason.
  SkippedUnknown,
}

impl ConstraintOutcome {
  pub fn is_enforced(self) -> bool {
    matches!(self, Self::AlreadyPresent | Self::Added)
  }
}

impl fmt::Display for ConstraintOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::AlreadyPresent => "already present",
      Self::Added => "added",
      Self::SkippedAlreadyViolated => "skipped (duplicates present)",
      Self::SkippedUnknown => "skipped (unknown error)",
    })
  }
}
