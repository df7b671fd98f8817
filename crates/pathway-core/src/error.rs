//! Error types for `pathway-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A seed record is missing a required field or carries a field of the
  /// wrong type.
  #[error("invalid {entity} record: {source}")]
  InvalidRecord {
    entity: &'static str,
    source: serde_json::Error,
  },

  #[error("{field} = {value} is outside the 1-7 level scale")]
  LevelOutOfRange { field: &'static str, value: i64 },

  #[error("level bounds inverted: min {min} > max {max}")]
  LevelBoundsInverted { min: i64, max: i64 },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
