//! `pathway-init`: create and seed the Pathway SQLite database.
//!
//! Reads `pathway.toml` (or the path given with `--config`), opens or creates
//! the database, applies the schema, seeds skills, roles, learning resources
//! and career paths from the JSON files in the seeds directory, and writes
//! connection hints for other tools.
//!
//! Every step is idempotent; re-running against a populated database is
//! always safe.
//!
//! ```
//! SQLITE_DB_PATH=./career.db cargo run -p pathway-init
//! ```

mod connection_info;
mod seeds;
mod settings;

use std::{fs, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use connection_info::ConnectionInfo;
use pathway_core::store::CareerStore;
use pathway_store_sqlite::SqliteStore;
use settings::{InitConfig, Overrides};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Create and seed the Pathway SQLite database")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "pathway.toml")]
  config: PathBuf,

  /// Database file; overrides the config file and SQLITE_DB_PATH.
  #[arg(long, value_name = "FILE")]
  db_path: Option<PathBuf>,

  /// Directory holding the seed JSON files.
  #[arg(long, value_name = "DIR")]
  seeds_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = InitConfig::load(&cli.config, &Overrides {
    db_path:   cli.db_path,
    seeds_dir: cli.seeds_dir,
  })?;

  fs::create_dir_all(&cfg.seeds_dir)
    .with_context(|| format!("failed to create {}", cfg.seeds_dir.display()))?;

  if cfg.db_path.exists() {
    tracing::info!("Using existing SQLite database at {}", cfg.db_path.display());
  } else {
    tracing::info!("Creating SQLite database at {}", cfg.db_path.display());
  }

  // The store (and its connection) is dropped at the end of this block on
  // every path, including errors.
  let (outcome, report) = {
    let store = SqliteStore::connect(&cfg.db_path)
      .await
      .with_context(|| format!("failed to open database at {:?}", cfg.db_path))?;

    let outcome = store.init_schema().await.context("failed to create schema")?;
    let input = seeds::load_input(&cfg.seeds_dir)?;
    let report = store.seed(input).await.context("seeding failed")?;
    (outcome, report)
  };

  let info = ConnectionInfo::resolve(&cfg.db_path)?;
  info.write(&cfg.output_dir)?;

  println!("SQLite setup complete!");
  println!("Database:   {}", cfg.db_path.display());
  println!("Location:   {}", info.path.display());
  println!("Resource uniqueness: {outcome}");
  println!("Skills:              {}", report.skills);
  println!("Roles:               {}", report.roles);
  println!("Learning resources:  {}", report.resources);
  println!("Career paths:        {}", report.career_paths);

  Ok(())
}
