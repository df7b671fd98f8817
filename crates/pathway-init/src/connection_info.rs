//! Connection hints written next to the database for humans and viewers.

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::Context as _;

pub const CONNECTION_FILE: &str = "db_connection.txt";
pub const VISUALIZER_DIR: &str = "db_visualizer";
pub const VISUALIZER_ENV: &str = "sqlite.env";

/// Absolute database location and the connection string derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionInfo {
  pub path:              PathBuf,
  pub connection_string: String,
}

impl ConnectionInfo {
  /// Resolve `db_path`, which must already exist.
  pub fn resolve(db_path: &Path) -> anyhow::Result<Self> {
    let path = fs::canonicalize(db_path)
      .with_context(|| format!("failed to resolve {}", db_path.display()))?;
    let connection_string = format!("sqlite:///{}", path.display());
    Ok(Self { path, connection_string })
  }

  /// Write `db_connection.txt` and `db_visualizer/sqlite.env` under
  /// `output_dir`.
  pub fn write(&self, output_dir: &Path) -> anyhow::Result<()> {
    let abs = self.path.display();

    let hints = format!(
      "# SQLite connection methods:\n\
       # Rust: rusqlite::Connection::open(\"{abs}\")\n\
       # Connection string: {}\n\
       # File path: {abs}\n",
      self.connection_string
    );
    let hints_path = output_dir.join(CONNECTION_FILE);
    fs::write(&hints_path, hints)
      .with_context(|| format!("failed to write {}", hints_path.display()))?;

    let viewer_dir = output_dir.join(VISUALIZER_DIR);
    fs::create_dir_all(&viewer_dir)
      .with_context(|| format!("failed to create {}", viewer_dir.display()))?;
    let env_path = viewer_dir.join(VISUALIZER_ENV);
    fs::write(&env_path, format!("export SQLITE_DB=\"{abs}\"\n"))
      .with_context(|| format!("failed to write {}", env_path.display()))?;

    Ok(())
  }
}
