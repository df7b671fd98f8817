//! Live constraint inspection.
//!
//! Legacy stores may predate a constraint the current schema declares, so
//! the probe reads the index catalog of the table as it actually exists
//! instead of trusting the `CREATE TABLE` text alone.

use rusqlite::{Connection, OptionalExtension as _};
use tracing::debug;

/// Whether `table` currently enforces uniqueness over exactly `columns`, in
/// that order.
///
/// Checks unique, non-partial indexes first, then scans the stored table
/// definition for an equivalent `UNIQUE (...)` clause. Never fails: a catalog
/// error counts as "no constraint".
pub fn has_composite_unique(conn: &Connection, table: &str, columns: &[&str]) -> bool {
  match probe(conn, table, columns) {
    Ok(found) => {
      debug!(table, ?columns, found, "probed composite uniqueness");
      found
    }
    Err(err) => {
      debug!(table, ?columns, error = %err, "constraint probe failed; treating as absent");
      false
    }
  }
}

fn probe(conn: &Connection, table: &str, columns: &[&str]) -> rusqlite::Result<bool> {
  Ok(unique_index_matches(conn, table, columns)? || table_clause_matches(conn, table, columns)?)
}

fn unique_index_matches(conn: &Connection, table: &str, columns: &[&str]) -> rusqlite::Result<bool> {
  let mut list = conn
    .prepare(r#"SELECT name FROM pragma_index_list(?1) WHERE "unique" = 1 AND partial = 0"#)?;
  let indexes = list
    .query_map([table], |row| row.get::<_, String>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut info = conn.prepare("SELECT name FROM pragma_index_info(?1) ORDER BY seqno")?;
  for index in indexes {
    // Expression columns come back as NULL and never match.
    let indexed = info
      .query_map([&index], |row| row.get::<_, Option<String>>(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    if same_columns(&indexed, columns) {
      debug!(table, index = %index, "matched unique index");
      return Ok(true);
    }
  }
  Ok(false)
}

fn same_columns(indexed: &[Option<String>], columns: &[&str]) -> bool {
  indexed.len() == columns.len()
    && indexed
      .iter()
      .zip(columns)
      .all(|(have, want)| have.as_deref().is_some_and(|h| h.eq_ignore_ascii_case(want)))
}

fn table_clause_matches(conn: &Connection, table: &str, columns: &[&str]) -> rusqlite::Result<bool> {
  let sql: Option<String> = conn
    .query_row(
      "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
      [table],
      |row| row.get(0),
    )
    .optional()?
    .flatten();

  let clause = squash(&format!("UNIQUE({})", columns.join(",")));
  Ok(sql.is_some_and(|sql| squash(&sql).contains(&clause)))
}

/// Drop all whitespace and fold case so formatting differences vanish.
fn squash(sql: &str) -> String {
  sql
    .chars()
    .filter(|c| !c.is_whitespace())
    .flat_map(char::to_lowercase)
    .collect()
}
