//! SQL schema for the Pathway SQLite store.
//!
//! Every statement is `IF NOT EXISTS`, so [`create`] is safe against a fresh
//! file and against a store written by an earlier schema version. Nothing
//! here drops or alters existing data.

use pathway_core::schema::ConstraintOutcome;
use rusqlite::{Connection, ErrorCode};
use tracing::{debug, warn};

use crate::probe;

/// Per-connection settings. Must run outside a transaction: SQLite ignores
/// `foreign_keys` changes while one is open.
pub const PRAGMAS: &str = "
PRAGMA foreign_keys = ON;
PRAGMA journal_mode = WAL;
";

/// Table holding learning resources, and its natural key.
pub const RESOURCE_TABLE: &str = "learning_resources";
pub const RESOURCE_KEY: [&str; 2] = ["title", "url"];

/// Best-effort migration for stores created before `UNIQUE (title, url)`.
pub const RESOURCE_UNIQUE_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
  ux_learning_resources_title_url ON learning_resources(title, url)";

/// Full schema DDL.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS skills (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    code        TEXT UNIQUE,      -- e.g. 'AUSM'; NULLs are never in conflict
    name        TEXT NOT NULL,
    category    TEXT,
    level_min   INTEGER,          -- 1-7
    level_max   INTEGER,          -- 1-7
    description TEXT
);

CREATE TABLE IF NOT EXISTS roles (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT UNIQUE NOT NULL,
    family      TEXT,             -- e.g. 'Engineering', 'Leadership'
    seniority   TEXT,             -- e.g. 'Junior', 'Senior'
    description TEXT
);

CREATE TABLE IF NOT EXISTS role_skill_requirements (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    role_id      INTEGER NOT NULL,
    skill_id     INTEGER NOT NULL,
    target_level INTEGER NOT NULL,
    weight       REAL DEFAULT 1.0,
    FOREIGN KEY (role_id)  REFERENCES roles(id)  ON DELETE CASCADE,
    FOREIGN KEY (skill_id) REFERENCES skills(id) ON DELETE CASCADE,
    UNIQUE (role_id, skill_id)
);

CREATE TABLE IF NOT EXISTS user_skills (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL,
    skill_id   INTEGER NOT NULL,
    level      INTEGER NOT NULL,
    evidence   TEXT,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (user_id, skill_id),
    FOREIGN KEY (skill_id) REFERENCES skills(id) ON DELETE CASCADE
);

-- Append-only.
CREATE TABLE IF NOT EXISTS user_progress (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL,
    role_id    INTEGER,
    skill_id   INTEGER NOT NULL,
    action     TEXT NOT NULL,     -- e.g. 'completed_resource'
    details    TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (role_id)  REFERENCES roles(id)  ON DELETE SET NULL,
    FOREIGN KEY (skill_id) REFERENCES skills(id) ON DELETE CASCADE
);

-- Stores older than this declaration may lack the UNIQUE clause.
CREATE TABLE IF NOT EXISTS learning_resources (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    title         TEXT NOT NULL,
    url           TEXT NOT NULL,
    provider      TEXT,
    resource_type TEXT,           -- course, article, book
    difficulty    TEXT,           -- beginner/intermediate/advanced
    description   TEXT,
    UNIQUE (title, url)
);

CREATE TABLE IF NOT EXISTS learning_resource_skills (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    resource_id           INTEGER NOT NULL,
    skill_id              INTEGER NOT NULL,
    recommended_level_min INTEGER,
    recommended_level_max INTEGER,
    FOREIGN KEY (resource_id) REFERENCES learning_resources(id) ON DELETE CASCADE,
    FOREIGN KEY (skill_id)    REFERENCES skills(id)             ON DELETE CASCADE,
    UNIQUE (resource_id, skill_id)
);

CREATE TABLE IF NOT EXISTS career_paths (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    from_role_id INTEGER NOT NULL,
    to_role_id   INTEGER NOT NULL,
    rationale    TEXT,
    FOREIGN KEY (from_role_id) REFERENCES roles(id) ON DELETE CASCADE,
    FOREIGN KEY (to_role_id)   REFERENCES roles(id) ON DELETE CASCADE,
    UNIQUE (from_role_id, to_role_id)
);

-- Append-only audit of recommendations shown to users.
CREATE TABLE IF NOT EXISTS recommendations (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id              INTEGER NOT NULL,
    context              TEXT,
    recommendations_json TEXT NOT NULL,
    created_at           TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_role_skill_role                 ON role_skill_requirements(role_id);
CREATE INDEX IF NOT EXISTS idx_role_skill_skill                ON role_skill_requirements(skill_id);
CREATE INDEX IF NOT EXISTS idx_user_skills_user                ON user_skills(user_id);
CREATE INDEX IF NOT EXISTS idx_user_skills_skill               ON user_skills(skill_id);
CREATE INDEX IF NOT EXISTS idx_user_progress_user              ON user_progress(user_id);
CREATE INDEX IF NOT EXISTS idx_learning_resource_skills_res    ON learning_resource_skills(resource_id);
CREATE INDEX IF NOT EXISTS idx_learning_resource_skills_skill  ON learning_resource_skills(skill_id);
CREATE INDEX IF NOT EXISTS idx_career_paths_from               ON career_paths(from_role_id);
CREATE INDEX IF NOT EXISTS idx_career_paths_to                 ON career_paths(to_role_id);
";

/// Apply [`PRAGMAS`] to a freshly opened connection.
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> { conn.execute_batch(PRAGMAS) }

/// Create every missing table and index, commit, then try to guarantee the
/// learning-resource uniqueness constraint.
///
/// Errors from the core DDL are fatal and propagate. The uniqueness step
/// never fails; its result is reported as a [`ConstraintOutcome`].
pub fn create(conn: &mut Connection) -> rusqlite::Result<ConstraintOutcome> {
  let tx = conn.transaction()?;
  tx.execute_batch(SCHEMA)?;
  tx.commit()?;

  Ok(ensure_resource_unique(conn))
}

/// Add `UNIQUE (title, url)` to `learning_resources` if the live table does
/// not already enforce it.
pub fn ensure_resource_unique(conn: &Connection) -> ConstraintOutcome {
  if probe::has_composite_unique(conn, RESOURCE_TABLE, &RESOURCE_KEY) {
    debug!("learning_resources already enforces UNIQUE (title, url)");
    return ConstraintOutcome::AlreadyPresent;
  }

  match conn.execute_batch(RESOURCE_UNIQUE_INDEX) {
    // `IF NOT EXISTS` is a no-op when a same-named index of another shape exists.
    Ok(()) if probe::has_composite_unique(conn, RESOURCE_TABLE, &RESOURCE_KEY) => {
      ConstraintOutcome::Added
    }
    Ok(()) => {
      warn!(
        index = "ux_learning_resources_title_url",
        "index name is taken by a non-unique index; uniqueness not enforced"
      );
      ConstraintOutcome::SkippedUnknown
    }
    Err(rusqlite::Error::SqliteFailure(e, msg)) if e.code == ErrorCode::ConstraintViolation => {
      warn!(
        error = msg.as_deref().unwrap_or("constraint violation"),
        "learning_resources holds duplicate (title, url) rows; uniqueness not enforced"
      );
      ConstraintOutcome::SkippedAlreadyViolated
    }
    Err(err) => {
      warn!(error = %err, "could not add UNIQUE (title, url) to learning_resources");
      ConstraintOutcome::SkippedUnknown
    }
  }
}
