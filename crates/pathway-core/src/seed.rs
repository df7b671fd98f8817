//! Typed seed records.
//!
//! The external loader hands over each record as a field mapping. Every seed
//! type knows how to parse itself out of such a mapping and how to check the
//! 1-7 level scale. Nested link declarations (role requirements, resource
//! skills) stay raw until they are linked so one bad link never rejects its
//! parent record.

use std::ops::RangeInclusive;

use serde::{
  Deserialize, Deserializer,
  de::{DeserializeOwned, Error as _},
};
use serde_json::Value;

use crate::{Error, Result};

/// Valid proficiency levels for skills, requirements and user profiles.
pub const LEVEL_SCALE: RangeInclusive<i64> = 1..=7;

/// Target level applied to a requirement that does not declare one.
pub const DEFAULT_TARGET_LEVEL: i64 = 3;

/// Weight applied to a requirement that does not declare one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// A record type that can be parsed from a loader-supplied field mapping.
pub trait SeedRecord: DeserializeOwned {
  /// Entity name used in error messages and logs.
  const ENTITY: &'static str;

  /// Check invariants serde cannot express.
  fn validate(&self) -> Result<()> { Ok(()) }

  /// Parse and validate one record.
  fn from_record(record: &Value) -> Result<Self> {
    let seed = Self::deserialize(record).map_err(|source| Error::InvalidRecord {
      entity: Self::ENTITY,
      source,
    })?;
    seed.validate()?;
    Ok(seed)
  }
}

pub fn check_level(field: &'static str, value: Option<i64>) -> Result<()> {
  match value {
    Some(v) if !LEVEL_SCALE.contains(&v) => Err(Error::LevelOutOfRange { field, value: v }),
    _ => Ok(()),
  }
}

fn check_bounds(
  min_field: &'static str,
  min: Option<i64>,
  max_field: &'static str,
  max: Option<i64>,
) -> Result<()> {
  check_level(min_field, min)?;
  check_level(max_field, max)?;
  if let (Some(min), Some(max)) = (min, max)
    && min > max
  {
    return Err(Error::LevelBoundsInverted { min, max });
  }
  Ok(())
}

/// Treat an explicit `null` list the same as an absent one.
fn null_as_empty<'de, D>(de: D) -> std::result::Result<Vec<Value>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<Vec<Value>>::deserialize(de)?.unwrap_or_default())
}

/// Accept `4`, `4.0` and `"4"` for an integer field. Fractional values are
/// rejected.
fn lenient_int<'de, D>(de: D) -> std::result::Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  let Some(value) = Option::<Value>::deserialize(de)? else {
    return Ok(None);
  };
  let parsed = match &value {
    Value::Number(n) => n
      .as_i64()
      .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  };
  parsed
    .map(Some)
    .ok_or_else(|| D::Error::custom(format!("expected an integer, found {value}")))
}

/// Accept a number or a numeric string.
fn lenient_float<'de, D>(de: D) -> std::result::Result<Option<f64>, D::Error>
where
  D: Deserializer<'de>,
{
  let Some(value) = Option::<Value>::deserialize(de)? else {
    return Ok(None);
  };
  let parsed = match &value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  };
  parsed
    .map(Some)
    .ok_or_else(|| D::Error::custom(format!("expected a number, found {value}")))
}

// ─── Skill ───────────────────────────────────────────────────────────────────

/// A skill keyed by its `code`; code-less skills are keyed by name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillSeed {
  #[serde(default)]
  pub code:        Option<String>,
  pub name:        String,
  #[serde(default)]
  pub category:    Option<String>,
  #[serde(default)]
  pub level_min:   Option<i64>,
  #[serde(default)]
  pub level_max:   Option<i64>,
  #[serde(default)]
  pub description: Option<String>,
}

impl SeedRecord for SkillSeed {
  const ENTITY: &'static str = "skill";

  fn validate(&self) -> Result<()> {
    check_bounds("level_min", self.level_min, "level_max", self.level_max)
  }
}

// ─── Role ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoleSeed {
  pub name:         String,
  #[serde(default)]
  pub family:       Option<String>,
  #[serde(default)]
  pub seniority:    Option<String>,
  #[serde(default)]
  pub description:  Option<String>,
  /// Raw requirement mappings; parse each with [`RequirementSeed::from_record`].
  #[serde(default, deserialize_with = "null_as_empty")]
  pub requirements: Vec<Value>,
}

impl SeedRecord for RoleSeed {
  const ENTITY: &'static str = "role";
}

/// A role's requirement on a skill, referenced by skill code or name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequirementSeed {
  pub skill:        String,
  #[serde(default, deserialize_with = "lenient_int")]
  pub target_level: Option<i64>,
  #[serde(default, deserialize_with = "lenient_float")]
  pub weight:       Option<f64>,
}

impl RequirementSeed {
  pub fn target_level(&self) -> i64 { self.target_level.unwrap_or(DEFAULT_TARGET_LEVEL) }

  pub fn weight(&self) -> f64 { self.weight.unwrap_or(DEFAULT_WEIGHT) }
}

impl SeedRecord for RequirementSeed {
  const ENTITY: &'static str = "role requirement";

  fn validate(&self) -> Result<()> { check_level("target_level", Some(self.target_level())) }
}

// ─── Learning resource ───────────────────────────────────────────────────────

/// A learning resource keyed by `(title, url)`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceSeed {
  pub title:         String,
  pub url:           String,
  #[serde(default)]
  pub provider:      Option<String>,
  #[serde(default)]
  pub resource_type: Option<String>,
  #[serde(default)]
  pub difficulty:    Option<String>,
  #[serde(default)]
  pub description:   Option<String>,
  /// Raw skill associations; parse each with [`ResourceSkillSeed::from_record`].
  #[serde(default, deserialize_with = "null_as_empty")]
  pub skills:        Vec<Value>,
}

impl SeedRecord for ResourceSeed {
  const ENTITY: &'static str = "learning resource";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceSkillSeed {
  pub skill:     String,
  #[serde(default)]
  pub level_min: Option<i64>,
  #[serde(default)]
  pub level_max: Option<i64>,
}

impl SeedRecord for ResourceSkillSeed {
  const ENTITY: &'static str = "resource skill";

  fn validate(&self) -> Result<()> {
    check_bounds("level_min", self.level_min, "level_max", self.level_max)
  }
}

// ─── Career path ─────────────────────────────────────────────────────────────

/// A directed edge between two roles, referenced by role name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CareerPathSeed {
  pub from:      String,
  pub to:        String,
  #[serde(default)]
  pub rationale: Option<String>,
}

impl SeedRecord for CareerPathSeed {
  const ENTITY: &'static str = "career path";
}

// ─── Input collections ───────────────────────────────────────────────────────

/// The collections handed to the seed pipeline.
///
/// `None` means the collection was not supplied at all (reported as missing);
/// `Some(vec![])` is an empty but present collection.
#[derive(Debug, Clone, Default)]
pub struct SeedInput {
  pub skills:       Option<Vec<Value>>,
  pub roles:        Option<Vec<Value>>,
  pub resources:    Option<Vec<Value>>,
  pub career_paths: Option<Vec<Value>>,
}
