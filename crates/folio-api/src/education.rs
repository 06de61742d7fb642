//! Handlers for the caller's education history.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `PUT`    | `/education` | Prepends an entry; `school`, `degree`, `fieldofstudy`, `from` required |
//! | `DELETE` | `/education/{index}` | Removes the entry at that list position |

use axum::{
  Json,
  extract::{Path, State},
};
use folio_core::{
  profile::{Education, Profile},
  store::ProfileStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::AuthUser,
  error::ApiError,
  experience::parse_index,
  profiles::{NO_PROFILE, parse_body},
  validate::{JsonBody, check, parse_date, validate},
};

#[derive(Debug, Deserialize)]
pub struct EducationBody {
  pub school:       String,
  pub degree:       String,
  pub fieldofstudy: String,
  pub from:         String,
  pub to:           Option<String>,
  #[serde(default)]
  pub current:      bool,
  pub description:  Option<String>,
}

impl From<EducationBody> for Education {
  fn from(b: EducationBody) -> Self {
    Education {
      school:       Some(b.school),
      degree:       Some(b.degree),
      fieldofstudy: Some(b.fieldofstudy),
      from:         Some(b.from),
      to:           b.to.as_deref().and_then(parse_date),
      current:      b.current,
      description:  b.description,
    }
  }
}

/// `PUT /education`
pub async fn add<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
  JsonBody(body): JsonBody,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + Clone + 'static,
{
  let errors = validate(&body, &[
    check("school", "School is required").not_empty(),
    check("degree", "Degree is required").not_empty(),
    check("fieldofstudy", "Field of study is required").not_empty(),
    check("from", "From date is required").not_empty(),
    check("to", "To date is invalid").date(),
  ]);
  if !errors.is_empty() {
    return Err(ApiError::Validation(errors));
  }

  let entry = Education::from(parse_body::<EducationBody>(body)?);
  let profile = state
    .store
    .add_education(user_id, entry)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::BadRequest(NO_PROFILE.into()))?;
  Ok(Json(profile))
}

/// `DELETE /education/{index}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
  Path(index): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + Clone + 'static,
{
  let index = parse_index(&index, "Education")?;
  let profile = state
    .store
    .remove_education(user_id, index)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::BadRequest(NO_PROFILE.into()))?;
  Ok(Json(profile))
}
