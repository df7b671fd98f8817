//! Runtime activity written by the surrounding application.
//!
//! Seeding never touches these tables. User skills are upserted on
//! `(user_id, skill_id)`; progress entries and recommendations are strictly
//! append-only.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, seed::check_level};

/// A user's self-assessed or measured level on one skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUserSkill {
  pub user_id:  i64,
  pub skill_id: i64,
  pub level:    i64,
  pub evidence: Option<String>,
}

impl NewUserSkill {
  pub fn validate(&self) -> Result<()> { check_level("level", Some(self.level)) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSkill {
  pub id:         i64,
  pub user_id:    i64,
  pub skill_id:   i64,
  pub level:      i64,
  pub evidence:   Option<String>,
  pub updated_at: NaiveDateTime,
}

/// One entry of the append-only progress log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgress {
  pub user_id:  i64,
  /// Focus role; cleared by the store if the role is later deleted.
  pub role_id:  Option<i64>,
  pub skill_id: i64,
  /// e.g. `"completed_resource"`, `"assessed_level"`.
  pub action:   String,
  pub details:  Option<String>,
}

/// An audit record of recommendations shown to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecommendation {
  pub user_id:         i64,
  pub context:         Option<Value>,
  pub recommendations: Value,
}
