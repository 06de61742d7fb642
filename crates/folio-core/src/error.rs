//! Error types for `folio-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A field the profile document cannot be written without.
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
