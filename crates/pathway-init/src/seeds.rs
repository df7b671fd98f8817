//! Seed file discovery and loading.

use std::{fs, io, path::Path};

use anyhow::Context as _;
use pathway_core::seed::SeedInput;
use serde_json::Value;
use tracing::{info, warn};

pub const SKILLS_FILE: &str = "sfia_skills.json";
pub const ROLES_FILE: &str = "roles.json";
pub const RESOURCES_FILE: &str = "learning_resources.json";
pub const CAREER_PATHS_FILE: &str = "career_paths.json";

/// Load every seed collection from `seeds_dir`.
///
/// A missing file yields a missing collection. A file that exists but cannot
/// be read or is not a JSON array is an error.
pub fn load_input(seeds_dir: &Path) -> anyhow::Result<SeedInput> {
  Ok(SeedInput {
    skills:       load_collection(&seeds_dir.join(SKILLS_FILE))?,
    roles:        load_collection(&seeds_dir.join(ROLES_FILE))?,
    resources:    load_collection(&seeds_dir.join(RESOURCES_FILE))?,
    career_paths: load_collection(&seeds_dir.join(CAREER_PATHS_FILE))?,
  })
}

fn load_collection(path: &Path) -> anyhow::Result<Option<Vec<Value>>> {
  let text = match fs::read_to_string(path) {
    Ok(text) => text,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      warn!("{} not found; collection not seeded", path.display());
      return Ok(None);
    }
    Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
  };

  let records: Vec<Value> = serde_json::from_str(&text)
    .with_context(|| format!("{} is not a JSON array of records", path.display()))?;
  info!(records = records.len(), "loaded {}", path.display());
  Ok(Some(records))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_files_are_missing_collections() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(ROLES_FILE), r#"[{"name": "SecEng"}]"#).unwrap();

    let input = load_input(dir.path()).unwrap();
    assert!(input.skills.is_none());
    assert!(input.resources.is_none());
    assert!(input.career_paths.is_none());
    assert_eq!(input.roles.unwrap().len(), 1);
  }

  #[test]
  fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(SKILLS_FILE), r#"{"code": "AUSM"}"#).unwrap();
    assert!(load_input(dir.path()).is_err());
  }
}
