//! [`SqliteStore`]: the SQLite implementation of [`CareerStore`].

use std::path::Path;

use pathway_core::{
  activity::{NewProgress, NewRecommendation, NewUserSkill, UserSkill},
  report::SeedReport,
  schema::ConstraintOutcome,
  seed::SeedInput,
  store::CareerStore,
};
use rusqlite::OptionalExtension as _;
use tracing::info;

use crate::{
  Result,
  encode::{RawUserSkill, encode_json},
  resolve::Resolver,
  schema,
  seed::SeedPipeline,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Pathway store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. The
/// connection closes when the last clone is dropped.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self::connect(path).await?;
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store with the schema applied; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self::configure(conn).await?;
    store.init_schema().await?;
    Ok(store)
  }

  /// Open (or create) the file at `path` and apply connection pragmas
  /// without touching the schema.
  pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::configure(conn).await
  }

  async fn configure(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        schema::apply_pragmas(conn)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn })
  }
}

// ─── CareerStore impl ────────────────────────────────────────────────────────

impl CareerStore for SqliteStore {
  type Error = crate::Error;

  // ── Schema and seeding ────────────────────────────────────────────────────

  async fn init_schema(&self) -> Result<ConstraintOutcome> {
    let outcome = self
      .conn
      .call(|conn| Ok(schema::create(conn)?))
      .await?;

    info!(%outcome, "schema ready; learning_resources UNIQUE (title, url)");
    Ok(outcome)
  }

  async fn seed(&self, input: SeedInput) -> Result<SeedReport> {
    let report = self
      .conn
      .call(move |conn| Ok(SeedPipeline::new(conn).run(&input)?))
      .await?;
    Ok(report)
  }

  // ── Reference resolution ──────────────────────────────────────────────────

  async fn skill_id(&self, code_or_name: String) -> Result<Option<i64>> {
    let id = self
      .conn
      .call(move |conn| Ok(Resolver::new(conn).skill_id(&code_or_name)?))
      .await?;
    Ok(id)
  }

  async fn role_id(&self, name: String) -> Result<Option<i64>> {
    let id = self
      .conn
      .call(move |conn| Ok(Resolver::new(conn).role_id(&name)?))
      .await?;
    Ok(id)
  }

  // ── Runtime activity ──────────────────────────────────────────────────────

  async fn set_user_skill(&self, input: NewUserSkill) -> Result<i64> {
    input.validate()?;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO user_skills (user_id, skill_id, level, evidence)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(user_id, skill_id) DO UPDATE SET
             level      = excluded.level,
             evidence   = excluded.evidence,
             updated_at = CURRENT_TIMESTAMP",
          rusqlite::params![input.user_id, input.skill_id, input.level, input.evidence],
        )?;
        Ok(conn.query_row(
          "SELECT id FROM user_skills WHERE user_id = ?1 AND skill_id = ?2",
          [input.user_id, input.skill_id],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(id)
  }

  async fn user_skill(&self, user_id: i64, skill_id: i64) -> Result<Option<UserSkill>> {
    let raw: Option<RawUserSkill> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, user_id, skill_id, level, evidence, updated_at
                 FROM user_skills WHERE user_id = ?1 AND skill_id = ?2",
              [user_id, skill_id],
              |row| {
                Ok(RawUserSkill {
                  id:         row.get(0)?,
                  user_id:    row.get(1)?,
                  skill_id:   row.get(2)?,
                  level:      row.get(3)?,
                  evidence:   row.get(4)?,
                  updated_at: row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUserSkill::into_user_skill).transpose()
  }

  async fn record_progress(&self, input: NewProgress) -> Result<i64> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO user_progress (user_id, role_id, skill_id, action, details)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            input.user_id,
            input.role_id,
            input.skill_id,
            input.action,
            input.details,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn record_recommendation(&self, input: NewRecommendation) -> Result<i64> {
    let context = input.context.as_ref().map(encode_json).transpose()?;
    let payload = encode_json(&input.recommendations)?;
    let user_id = input.user_id;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO recommendations (user_id, context, recommendations_json)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![user_id, context, payload],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }
}
