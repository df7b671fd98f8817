//! Natural-key reference resolution.
//!
//! Seed data links entities by natural key (skill code or name, role name).
//! A reference that does not resolve is `None`, not an error: the referenced
//! row may be seeded by a later run, or the reference may be misspelled.

use rusqlite::{Connection, OptionalExtension as _};

/// Resolves natural keys to surrogate ids on a borrowed connection.
pub struct Resolver<'c> {
  conn: &'c Connection,
}

impl<'c> Resolver<'c> {
  pub fn new(conn: &'c Connection) -> Self { Self { conn } }

  /// Resolve a skill token as a `code` first and, failing that, as a `name`.
  ///
  /// Among several name matches the oldest row wins.
  pub fn skill_id(&self, code_or_name: &str) -> rusqlite::Result<Option<i64>> {
    self
      .conn
      .prepare_cached(
        "SELECT id FROM skills
          WHERE code = ?1 OR name = ?1
          ORDER BY CASE WHEN code = ?1 THEN 0 ELSE 1 END, id
          LIMIT 1",
      )?
      .query_row([code_or_name], |r| r.get(0))
      .optional()
  }

  pub fn role_id(&self, name: &str) -> rusqlite::Result<Option<i64>> {
    self
      .conn
      .prepare_cached("SELECT id FROM roles WHERE name = ?1")?
      .query_row([name], |r| r.get(0))
      .optional()
  }
}
