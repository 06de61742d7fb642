//! Error type for `folio-store-sqlite`.

use folio_core::store::{Classify, ErrorKind};
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] folio_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("email already registered: {0}")]
  DuplicateEmail(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Core(e) => e.kind(),
      Error::Database(e) => classify_database(e),
      Error::DuplicateEmail(_) => ErrorKind::Conflict,
      Error::Json(_) | Error::Uuid(_) | Error::DateParse(_) => ErrorKind::Fatal,
    }
  }
}

fn classify_database(e: &tokio_rusqlite::Error) -> ErrorKind {
  let code = match e {
    tokio_rusqlite::Error::Rusqlite(e) => e.sqlite_error_code(),
    _ => None,
  };
  match code {
    Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => ErrorKind::Transient,
    Some(ErrorCode::ConstraintViolation) => ErrorKind::Conflict,
    _ => ErrorKind::Fatal,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sqlite_failure(code: std::ffi::c_int) -> Error {
    let e = rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None);
    Error::Database(tokio_rusqlite::Error::Rusqlite(e))
  }

  #[test]
  fn busy_and_locked_are_transient() {
    assert_eq!(sqlite_failure(rusqlite::ffi::SQLITE_BUSY).kind(), ErrorKind::Transient);
    assert_eq!(sqlite_failure(rusqlite::ffi::SQLITE_LOCKED).kind(), ErrorKind::Transient);
  }

  #[test]
  fn constraint_violation_is_a_conflict() {
    assert_eq!(sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT).kind(), ErrorKind::Conflict);
  }

  #[test]
  fn other_failures_are_fatal() {
    assert_eq!(sqlite_failure(rusqlite::ffi::SQLITE_CORRUPT).kind(), ErrorKind::Fatal);
    let json_err = serde_json::from_str::<u8>("x").unwrap_err();
    assert_eq!(Error::Json(json_err).kind(), ErrorKind::Fatal);
  }

  #[test]
  fn core_errors_keep_their_kind() {
    let missing = Error::Core(folio_core::Error::UserNotFound(uuid::Uuid::nil()));
    assert_eq!(missing.kind(), ErrorKind::NotFound);
  }
}
