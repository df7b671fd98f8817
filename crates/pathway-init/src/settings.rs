//! Layered configuration for the init binary.
//!
//! Precedence, lowest first: built-in defaults, the optional TOML file,
//! `PATHWAY_*` environment variables, the legacy `SQLITE_DB_PATH` variable,
//! then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_DB: &str = "myapp.db";

/// Runtime configuration, deserialised from all layers.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InitConfig {
  /// SQLite database file; created if absent.
  pub db_path:    PathBuf,
  /// Directory holding the seed JSON files.
  pub seeds_dir:  PathBuf,
  /// Directory receiving `db_connection.txt` and `db_visualizer/`.
  pub output_dir: PathBuf,
}

/// Values supplied on the command line; `None` leaves lower layers in force.
#[derive(Debug, Default)]
pub struct Overrides {
  pub db_path:   Option<PathBuf>,
  pub seeds_dir: Option<PathBuf>,
}

impl InitConfig {
  pub fn load(config_file: &Path, overrides: &Overrides) -> anyhow::Result<Self> {
    Self::from_sources(config_file, std::env::var("SQLITE_DB_PATH").ok(), overrides)
  }

  fn from_sources(
    config_file: &Path,
    legacy_db_path: Option<String>,
    overrides: &Overrides,
  ) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("db_path", DEFAULT_DB)?
      .set_default("seeds_dir", "seeds")?
      .set_default("output_dir", ".")?
      .add_source(config::File::from(config_file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("PATHWAY"))
      .set_override_option("db_path", legacy_db_path)?
      .set_override_option("db_path", overrides.db_path.as_deref().map(path_value))?
      .set_override_option("seeds_dir", overrides.seeds_dir.as_deref().map(path_value))?
      .build()
      .with_context(|| format!("failed to read config file {config_file:?}"))?;

    settings
      .try_deserialize()
      .context("failed to deserialise InitConfig")
  }
}

fn path_value(path: &Path) -> String { path.to_string_lossy().into_owned() }
