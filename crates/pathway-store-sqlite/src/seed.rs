//! The seed pipeline.
//!
//! Passes run in dependency order: skills, roles (with requirements),
//! learning resources (with skill links), then career paths. Each pass runs
//! in its own transaction and commits when its collection is exhausted, so a
//! later failure never undoes an earlier pass. Inside a pass every record and
//! every link gets its own savepoint: a failing record is rolled back, logged
//! and counted, and the pass moves on.

use pathway_core::{
  report::{PassReport, SeedReport},
  seed::{
    CareerPathSeed, RequirementSeed, ResourceSeed, ResourceSkillSeed, RoleSeed, SeedInput,
    SeedRecord, SkillSeed,
  },
};
use rusqlite::{Connection, Transaction};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
  Result,
  resolve::Resolver,
  upsert::{
    CareerPathRow, CareerPathUpserter, RequirementRow, RequirementUpserter, ResourceSkillRow,
    ResourceSkillUpserter, ResourceUpserter, RoleUpserter, SkillUpserter, Upsert,
  },
};

/// Runs the ordered seed passes over one connection.
pub struct SeedPipeline<'c> {
  conn: &'c mut Connection,
}

impl<'c> SeedPipeline<'c> {
  pub fn new(conn: &'c mut Connection) -> Self { Self { conn } }

  /// Run every pass. Only transaction-level store errors are returned;
  /// record-level failures are counted in the report.
  pub fn run(&mut self, input: &SeedInput) -> rusqlite::Result<SeedReport> {
    let skills = self.skills(input.skills.as_deref())?;
    let roles = self.roles(input.roles.as_deref())?;
    let resources = self.resources(input.resources.as_deref())?;
    let career_paths = self.career_paths(input.career_paths.as_deref())?;
    Ok(SeedReport { skills, roles, resources, career_paths })
  }

  pub fn skills(&mut self, records: Option<&[Value]>) -> rusqlite::Result<PassReport> {
    let Some(records) = supplied("skills", records) else {
      return Ok(PassReport::missing());
    };

    let mut report = PassReport::started();
    let mut tx = self.conn.transaction()?;

    for (index, record) in records.iter().enumerate() {
      let outcome = in_savepoint(&mut tx, |conn| {
        let skill = SkillSeed::from_record(record)?;
        Ok(SkillUpserter.upsert(conn, &skill)?)
      });
      match outcome {
        Ok(_) => report.seeded += 1,
        Err(err) => {
          warn!(index, error = %err, "skipping skill record");
          report.failed += 1;
        }
      }
    }

    tx.commit()?;
    info!(seeded = report.seeded, failed = report.failed, "seeded skills");
    Ok(report)
  }

  pub fn roles(&mut self, records: Option<&[Value]>) -> rusqlite::Result<PassReport> {
    let Some(records) = supplied("roles", records) else {
      return Ok(PassReport::missing());
    };

    let mut report = PassReport::started();
    let mut tx = self.conn.transaction()?;

    for (index, record) in records.iter().enumerate() {
      let seeded = in_savepoint(&mut tx, |conn| {
        let role = RoleSeed::from_record(record)?;
        let id = RoleUpserter.upsert(conn, &role)?;
        Ok((id, role))
      });
      let (role_id, role) = match seeded {
        Ok(seeded) => seeded,
        Err(err) => {
          warn!(index, error = %err, "skipping role record");
          report.failed += 1;
          continue;
        }
      };
      report.seeded += 1;

      for raw in &role.requirements {
        let linked = in_savepoint(&mut tx, |conn| link_requirement(conn, role_id, raw));
        tally_link(&mut report, linked, "role requirement", &role.name);
      }
    }

    tx.commit()?;
    info!(
      seeded = report.seeded,
      failed = report.failed,
      requirements = report.linked,
      unlinked = report.unlinked,
      "seeded roles"
    );
    Ok(report)
  }

  pub fn resources(&mut self, records: Option<&[Value]>) -> rusqlite::Result<PassReport> {
    let Some(records) = supplied("learning resources", records) else {
      return Ok(PassReport::missing());
    };

    let mut report = PassReport::started();
    let mut tx = self.conn.transaction()?;
    let upserter = ResourceUpserter::detect(&tx);
    info!(strategy = ?upserter.strategy(), "seeding learning resources");

    for (index, record) in records.iter().enumerate() {
      let seeded = in_savepoint(&mut tx, |conn| {
        let res = ResourceSeed::from_record(record)?;
        let id = upserter.upsert(conn, &res)?;
        Ok((id, res))
      });
      let (resource_id, res) = match seeded {
        Ok(seeded) => seeded,
        Err(err) => {
          warn!(index, error = %err, "skipping learning resource record");
          report.failed += 1;
          continue;
        }
      };
      report.seeded += 1;

      for raw in &res.skills {
        let linked = in_savepoint(&mut tx, |conn| link_resource_skill(conn, resource_id, raw));
        tally_link(&mut report, linked, "resource skill", &res.title);
      }
    }

    tx.commit()?;
    info!(
      seeded = report.seeded,
      failed = report.failed,
      links = report.linked,
      unlinked = report.unlinked,
      "seeded learning resources"
    );
    Ok(report)
  }

  pub fn career_paths(&mut self, records: Option<&[Value]>) -> rusqlite::Result<PassReport> {
    let Some(records) = supplied("career paths", records) else {
      return Ok(PassReport::missing());
    };

    let mut report = PassReport::started();
    let mut tx = self.conn.transaction()?;

    for (index, record) in records.iter().enumerate() {
      let linked = in_savepoint(&mut tx, |conn| {
        let path = CareerPathSeed::from_record(record)?;
        let resolver = Resolver::new(conn);
        let (Some(from_role_id), Some(to_role_id)) =
          (resolver.role_id(&path.from)?, resolver.role_id(&path.to)?)
        else {
          debug!(from = %path.from, to = %path.to, "career path role not found; not linked");
          return Ok(false);
        };
        if from_role_id == to_role_id {
          debug!(role = %path.from, "career path loops onto itself; not linked");
          return Ok(false);
        }

        CareerPathUpserter.upsert(conn, &CareerPathRow {
          from_role_id,
          to_role_id,
          rationale: path.rationale,
        })?;
        Ok(true)
      });

      match linked {
        Ok(true) => {
          report.seeded += 1;
          report.linked += 1;
        }
        Ok(false) => {
          report.seeded += 1;
          report.unlinked += 1;
        }
        Err(err) => {
          warn!(index, error = %err, "skipping career path record");
          report.failed += 1;
        }
      }
    }

    tx.commit()?;
    info!(
      seeded = report.seeded,
      failed = report.failed,
      edges = report.linked,
      unlinked = report.unlinked,
      "seeded career paths"
    );
    Ok(report)
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn supplied<'a>(pass: &str, records: Option<&'a [Value]>) -> Option<&'a [Value]> {
  if records.is_none() {
    warn!(pass, "collection not supplied; nothing seeded");
  }
  records
}

/// Run `f` inside a savepoint of `tx`, releasing it on success and rolling it
/// back (on drop) on failure.
fn in_savepoint<T>(
  tx: &mut Transaction<'_>,
  f: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
  let sp = tx.savepoint()?;
  let value = f(&sp)?;
  sp.commit()?;
  Ok(value)
}

/// Resolve and write one requirement. `Ok(false)` means the skill reference
/// did not resolve.
fn link_requirement(conn: &Connection, role_id: i64, raw: &Value) -> Result<bool> {
  let req = RequirementSeed::from_record(raw)?;
  let Some(skill_id) = Resolver::new(conn).skill_id(&req.skill)? else {
    debug!(skill = %req.skill, "requirement skill not found; not linked");
    return Ok(false);
  };

  RequirementUpserter.upsert(conn, &RequirementRow {
    role_id,
    skill_id,
    target_level: req.target_level(),
    weight: req.weight(),
  })?;
  Ok(true)
}

fn link_resource_skill(conn: &Connection, resource_id: i64, raw: &Value) -> Result<bool> {
  let link = ResourceSkillSeed::from_record(raw)?;
  let Some(skill_id) = Resolver::new(conn).skill_id(&link.skill)? else {
    debug!(skill = %link.skill, "resource skill not found; not linked");
    return Ok(false);
  };

  ResourceSkillUpserter.upsert(conn, &ResourceSkillRow {
    resource_id,
    skill_id,
    level_min: link.level_min,
    level_max: link.level_max,
  })?;
  Ok(true)
}

fn tally_link(report: &mut PassReport, linked: Result<bool>, what: &str, owner: &str) {
  match linked {
    Ok(true) => report.linked += 1,
    Ok(false) => report.unlinked += 1,
    Err(err) => {
      warn!(owner, error = %err, "dropping invalid {what}");
      report.unlinked += 1;
    }
  }
}
