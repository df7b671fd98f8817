//! The `CareerStore` trait.
//!
//! Implemented by storage backends (e.g. `pathway-store-sqlite`). The init
//! binary and any application layer depend on this abstraction.

use std::future::Future;

use crate::{
  activity::{NewProgress, NewRecommendation, NewUserSkill, UserSkill},
  report::SeedReport,
  schema::ConstraintOutcome,
  seed::SeedInput,
};

/// Abstraction over a Pathway store backend.
///
/// Schema creation and seeding are idempotent: calling them again against a
/// populated store converges to the same state.
pub trait CareerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Schema and seeding ────────────────────────────────────────────────

  /// Create every table and index that is missing and report whether the
  /// learning-resource uniqueness constraint is enforced.
  fn init_schema(
    &self,
  ) -> impl Future<Output = Result<ConstraintOutcome, Self::Error>> + Send + '_;

  /// Run the ordered seed passes. Record-level failures are counted in the
  /// report, not returned.
  fn seed(
    &self,
    input: SeedInput,
  ) -> impl Future<Output = Result<SeedReport, Self::Error>> + Send + '_;

  // ── Reference resolution ──────────────────────────────────────────────

  /// Resolve a skill by code, falling back to name.
  fn skill_id(
    &self,
    code_or_name: String,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  fn role_id(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  // ── Runtime activity ──────────────────────────────────────────────────

  /// Insert or update the user's level on a skill; returns the row id.
  fn set_user_skill(
    &self,
    input: NewUserSkill,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn user_skill(
    &self,
    user_id: i64,
    skill_id: i64,
  ) -> impl Future<Output = Result<Option<UserSkill>, Self::Error>> + Send + '_;

  /// Append a progress entry; returns the row id.
  fn record_progress(
    &self,
    input: NewProgress,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Append a recommendation audit record; returns the row id.
  fn record_recommendation(
    &self,
    input: NewRecommendation,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;
}
