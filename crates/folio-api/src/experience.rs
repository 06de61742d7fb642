//! Handlers for the caller's work history.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `PUT`    | `/experience` | Prepends an entry; `title`, `company`, `from` required |
//! | `DELETE` | `/experience/{index}` | Removes the entry at that list position |

use axum::{
  Json,
  extract::{Path, State},
};
use folio_core::{
  profile::{Experience, Profile},
  store::ProfileStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::AuthUser,
  error::ApiError,
  profiles::{NO_PROFILE, parse_body},
  validate::{JsonBody, check, parse_date, validate},
};

#[derive(Debug, Deserialize)]
pub struct ExperienceBody {
  pub title:       String,
  pub company:     String,
  pub location:    Option<String>,
  pub from:        String,
  pub to:          Option<String>,
  #[serde(default)]
  pub current:     bool,
  pub description: Option<String>,
}

impl From<ExperienceBody> for Experience {
  fn from(b: ExperienceBody) -> Self {
    Experience {
      title:       b.title,
      company:     b.company,
      location:    b.location,
      from:        b.from,
      to:          b.to.as_deref().and_then(parse_date),
      current:     b.current,
      description: b.description,
    }
  }
}

/// Parse a list position from the path; anything but a non-negative integer
/// is a malformed reference.
pub(crate) fn parse_index(raw: &str, what: &str) -> Result<usize, ApiError> {
  raw
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("{what} not found")))
}

/// `PUT /experience`
pub async fn add<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
  JsonBody(body): JsonBody,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + Clone + 'static,
{
  let errors = validate(&body, &[
    check("title", "Title is required").not_empty(),
    check("company", "Company is required").not_empty(),
    check("from", "From date is required").not_empty(),
    check("to", "To date is invalid").date(),
  ]);
  if !errors.is_empty() {
    return Err(ApiError::Validation(errors));
  }

  let entry = Experience::from(parse_body::<ExperienceBody>(body)?);
  let profile = state
    .store
    .add_experience(user_id, entry)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::BadRequest(NO_PROFILE.into()))?;
  Ok(Json(profile))
}

/// `DELETE /experience/{index}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
  Path(index): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + Clone + 'static,
{
  let index = parse_index(&index, "Experience")?;
  let profile = state
    .store
    .remove_experience(user_id, index)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::BadRequest(NO_PROFILE.into()))?;
  Ok(Json(profile))
}
