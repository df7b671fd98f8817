//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are written by SQLite itself (`CURRENT_TIMESTAMP`, UTC,
//! `YYYY-MM-DD HH:MM:SS`). JSON payloads are stored as compact text.

use chrono::NaiveDateTime;
use pathway_core::activity::UserSkill;
use serde_json::Value;

use crate::{Error, Result};

const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn decode_timestamp(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, SQLITE_TIMESTAMP)
    .map_err(|e| Error::Timestamp(format!("{s:?}: {e}")))
}

// ─── JSON ────────────────────────────────────────────────────────────────────

pub fn encode_json(value: &Value) -> Result<String> { Ok(serde_json::to_string(value)?) }

// ─── Raw row types ───────────────────────────────────────────────────────────

/// A `user_skills` row exactly as read from SQLite.
pub struct RawUserSkill {
  pub id:         i64,
  pub user_id:    i64,
  pub skill_id:   i64,
  pub level:      i64,
  pub evidence:   Option<String>,
  pub updated_at: String,
}

impl RawUserSkill {
  pub fn into_user_skill(self) -> Result<UserSkill> {
    Ok(UserSkill {
      id:         self.id,
      user_id:    self.user_id,
      skill_id:   self.skill_id,
      level:      self.level,
      evidence:   self.evidence,
      updated_at: decode_timestamp(&self.updated_at)?,
    })
  }
}
