//! Natural-key upserts.
//!
//! Each [`Upsert`] implementation inserts or updates one entity and then
//! re-reads its surrogate id by natural key. The id is never taken from the
//! insert itself: a conflict that resolves as an update does not produce a
//! fresh rowid.

use pathway_core::seed::{ResourceSeed, RoleSeed, SkillSeed};
use rusqlite::{Connection, ToSql, params};
use tracing::debug;

use crate::{
  probe,
  schema::{RESOURCE_KEY, RESOURCE_TABLE},
};

/// Insert-or-update keyed by natural key, returning the resolved id.
pub trait Upsert {
  type Record: ?Sized;

  fn upsert(&self, conn: &Connection, record: &Self::Record) -> rusqlite::Result<i64>;
}

// ─── Strategy ────────────────────────────────────────────────────────────────

/// How a natural key is made unique on the live table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStrategy {
  /// A unique index backs the key; use `INSERT ... ON CONFLICT DO UPDATE`.
  ConstraintBacked,
  /// No unique index; insert when the key is absent, then update every row
  /// carrying the key. Not atomic against concurrent writers.
  Fallback,
}

impl UpsertStrategy {
  /// Choose a strategy from the table's live index catalog.
  pub fn detect(conn: &Connection, table: &str, key: &[&str]) -> Self {
    if probe::has_composite_unique(conn, table, key) {
      Self::ConstraintBacked
    } else {
      Self::Fallback
    }
  }
}

// ─── Skills ──────────────────────────────────────────────────────────────────

/// Skills conflict on `code`. A code-less skill is matched on
/// `(code IS NULL, name)` instead, since NULL codes never conflict.
pub struct SkillUpserter;

impl Upsert for SkillUpserter {
  type Record = SkillSeed;

  fn upsert(&self, conn: &Connection, skill: &SkillSeed) -> rusqlite::Result<i64> {
    let Some(code) = skill.code.as_deref() else {
      return upsert_codeless_skill(conn, skill);
    };

    conn.execute(
      "INSERT INTO skills (code, name, category, level_min, level_max, description)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)
       ON CONFLICT(code) DO UPDATE SET
         name        = excluded.name,
         category    = excluded.category,
         level_min   = excluded.level_min,
         level_max   = excluded.level_max,
         description = excluded.description",
      params![
        code,
        skill.name,
        skill.category,
        skill.level_min,
        skill.level_max,
        skill.description,
      ],
    )?;

    conn.query_row("SELECT id FROM skills WHERE code = ?1", [code], |r| r.get(0))
  }
}

fn upsert_codeless_skill(conn: &Connection, skill: &SkillSeed) -> rusqlite::Result<i64> {
  let updated = conn.execute(
    "UPDATE skills
        SET category = ?2, level_min = ?3, level_max = ?4, description = ?5
      WHERE code IS NULL AND name = ?1",
    params![skill.name, skill.category, skill.level_min, skill.level_max, skill.description],
  )?;

  if updated == 0 {
    conn.execute(
      "INSERT INTO skills (code, name, category, level_min, level_max, description)
       VALUES (NULL, ?1, ?2, ?3, ?4, ?5)",
      params![skill.name, skill.category, skill.level_min, skill.level_max, skill.description],
    )?;
  }

  conn.query_row(
    "SELECT id FROM skills WHERE code IS NULL AND name = ?1 ORDER BY id LIMIT 1",
    [&skill.name],
    |r| r.get(0),
  )
}

// ─── Roles ───────────────────────────────────────────────────────────────────

pub struct RoleUpserter;

impl Upsert for RoleUpserter {
  type Record = RoleSeed;

  fn upsert(&self, conn: &Connection, role: &RoleSeed) -> rusqlite::Result<i64> {
    conn.execute(
      "INSERT INTO roles (name, family, seniority, description)
       VALUES (?1, ?2, ?3, ?4)
       ON CONFLICT(name) DO UPDATE SET
         family      = excluded.family,
         seniority   = excluded.seniority,
         description = excluded.description",
      params![role.name, role.family, role.seniority, role.description],
    )?;

    conn.query_row("SELECT id FROM roles WHERE name = ?1", [&role.name], |r| r.get(0))
  }
}

// ─── Role requirements ───────────────────────────────────────────────────────

/// A resolved `(role, skill)` requirement ready to be written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequirementRow {
  pub role_id:      i64,
  pub skill_id:     i64,
  pub target_level: i64,
  pub weight:       f64,
}

pub struct RequirementUpserter;

impl Upsert for RequirementUpserter {
  type Record = RequirementRow;

  fn upsert(&self, conn: &Connection, row: &RequirementRow) -> rusqlite::Result<i64> {
    conn.execute(
      "INSERT INTO role_skill_requirements (role_id, skill_id, target_level, weight)
       VALUES (?1, ?2, ?3, ?4)
       ON CONFLICT(role_id, skill_id) DO UPDATE SET
         target_level = excluded.target_level,
         weight       = excluded.weight",
      params![row.role_id, row.skill_id, row.target_level, row.weight],
    )?;

    conn.query_row(
      "SELECT id FROM role_skill_requirements WHERE role_id = ?1 AND skill_id = ?2",
      [row.role_id, row.skill_id],
      |r| r.get(0),
    )
  }
}

// ─── Learning resources ──────────────────────────────────────────────────────

/// Learning-resource upserter; the strategy is fixed when it is built.
#[derive(Debug, Clone, Copy)]
pub struct ResourceUpserter {
  strategy: UpsertStrategy,
}

impl ResourceUpserter {
  pub fn new(strategy: UpsertStrategy) -> Self { Self { strategy } }

  /// Probe `learning_resources` once and pick the matching strategy.
  pub fn detect(conn: &Connection) -> Self {
    let strategy = UpsertStrategy::detect(conn, RESOURCE_TABLE, &RESOURCE_KEY);
    debug!(?strategy, "selected learning resource upsert strategy");
    Self::new(strategy)
  }

  pub fn strategy(&self) -> UpsertStrategy { self.strategy }
}

impl Upsert for ResourceUpserter {
  type Record = ResourceSeed;

  fn upsert(&self, conn: &Connection, res: &ResourceSeed) -> rusqlite::Result<i64> {
    let values: [&dyn ToSql; 6] = [
      &res.title,
      &res.url,
      &res.provider,
      &res.resource_type,
      &res.difficulty,
      &res.description,
    ];

    match self.strategy {
      UpsertStrategy::ConstraintBacked => {
        conn.execute(
          "INSERT INTO learning_resources
             (title, url, provider, resource_type, difficulty, description)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(title, url) DO UPDATE SET
             provider      = excluded.provider,
             resource_type = excluded.resource_type,
             difficulty    = excluded.difficulty,
             description   = excluded.description",
          values,
        )?;
      }
      UpsertStrategy::Fallback => {
        conn.execute(
          "INSERT INTO learning_resources
             (title, url, provider, resource_type, difficulty, description)
           SELECT ?1, ?2, ?3, ?4, ?5, ?6
            WHERE NOT EXISTS (
              SELECT 1 FROM learning_resources WHERE title = ?1 AND url = ?2
            )",
          values,
        )?;
        // Every duplicate carrying the key converges to the incoming values.
        conn.execute(
          "UPDATE learning_resources
              SET provider = ?3, resource_type = ?4, difficulty = ?5, description = ?6
            WHERE title = ?1 AND url = ?2",
          values,
        )?;
      }
    }

    conn.query_row(
      "SELECT id FROM learning_resources WHERE title = ?1 AND url = ?2 ORDER BY id LIMIT 1",
      [&res.title, &res.url],
      |r| r.get(0),
    )
  }
}

// ─── Resource skills ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSkillRow {
  pub resource_id: i64,
  pub skill_id:    i64,
  pub level_min:   Option<i64>,
  pub level_max:   Option<i64>,
}

pub struct ResourceSkillUpserter;

impl Upsert for ResourceSkillUpserter {
  type Record = ResourceSkillRow;

  fn upsert(&self, conn: &Connection, row: &ResourceSkillRow) -> rusqlite::Result<i64> {
    conn.execute(
      "INSERT INTO learning_resource_skills
         (resource_id, skill_id, recommended_level_min, recommended_level_max)
       VALUES (?1, ?2, ?3, ?4)
       ON CONFLICT(resource_id, skill_id) DO UPDATE SET
         recommended_level_min = excluded.recommended_level_min,
         recommended_level_max = excluded.recommended_level_max",
      params![row.resource_id, row.skill_id, row.level_min, row.level_max],
    )?;

    conn.query_row(
      "SELECT id FROM learning_resource_skills WHERE resource_id = ?1 AND skill_id = ?2",
      [row.resource_id, row.skill_id],
      |r| r.get(0),
    )
  }
}

// ─── Career paths ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareerPathRow {
  pub from_role_id: i64,
  pub to_role_id:   i64,
  pub rationale:    Option<String>,
}

pub struct CareerPathUpserter;

impl Upsert for CareerPathUpserter {
  type Record = CareerPathRow;

  fn upsert(&self, conn: &Connection, row: &CareerPathRow) -> rusqlite::Result<i64> {
    conn.execute(
      "INSERT INTO career_paths (from_role_id, to_role_id, rationale)
       VALUES (?1, ?2, ?3)
       ON CONFLICT(from_role_id, to_role_id) DO UPDATE SET
         rationale = excluded.rationale",
      params![row.from_role_id, row.to_role_id, row.rationale],
    )?;

    conn.query_row(
      "SELECT id FROM career_paths WHERE from_role_id = ?1 AND to_role_id = ?2",
      [row.from_role_id, row.to_role_id],
      |r| r.get(0),
    )
  }
}
