//! Handlers for the profile endpoints.
//!
//! | Method   | Path | Auth | Notes |
//! |----------|------|------|-------|
//! | `GET`    | `/me` | yes | 400 if the caller has no profile |
//! | `POST`   | `/` | yes | Create or replace the caller's profile |
//! | `GET`    | `/` | no  | All profiles, user name and avatar attached |
//! | `GET`    | `/user/{user_id}` | no | 400 if absent or the id is malformed |
//! | `DELETE` | `/` | yes | Removes the caller's profile and account |

use axum::{
  Json,
  extract::{Path, State},
};
use folio_core::{
  profile::{PopulatedProfile, Profile, ProfileFields, Social},
  store::ProfileStore,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
  AppState,
  auth::AuthUser,
  error::ApiError,
  normalize::normalize_url,
  validate::{JsonBody, Violation, check, validate},
};

pub(crate) const NO_PROFILE: &str = "There is no profile for this user";
const PROFILE_NOT_FOUND: &str = "Profile not found";

// ─── Request body ─────────────────────────────────────────────────────────────

/// `skills` arrives either as a JSON array or as one comma-delimited string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
  List(Vec<String>),
  Delimited(String),
}

impl SkillsInput {
  /// Arrays are kept as-is. Delimited strings are split on commas, trimmed,
  /// and stored with a single leading space per element, which existing
  /// clients rely on.
  pub fn into_skills(self) -> Vec<String> {
    match self {
      SkillsInput::List(list) => list,
      SkillsInput::Delimited(s) => s.split(',').map(|skill| format!(" {}", skill.trim())).collect(),
    }
  }
}

/// JSON body accepted by `POST /`.
#[derive(Debug, Deserialize)]
pub struct ProfileBody {
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub bio:            Option<String>,
  pub status:         String,
  pub githubusername: Option<String>,
  pub skills:         SkillsInput,
  pub medium:         Option<String>,
  pub facebook:       Option<String>,
  pub twitter:        Option<String>,
  pub instagram:      Option<String>,
  pub linkedin:       Option<String>,
  pub github:         Option<String>,
}

fn truthy(value: Option<String>) -> Option<String> { value.filter(|s| !s.is_empty()) }

impl ProfileBody {
  /// Apply the write-time transformations and attach the owner.
  pub fn into_fields(self, user: Uuid) -> Result<ProfileFields, ApiError> {
    let website = match self.website {
      None => None,
      Some(w) if w.is_empty() => Some(String::new()),
      Some(w) => Some(normalize_url(&w, true).map_err(|_| {
        ApiError::Validation(vec![Violation {
          value:    Some(Value::String(w.clone())),
          msg:      "Please include a valid URL".into(),
          param:    "website".into(),
          location: "body",
        }])
      })?),
    };

    Ok(ProfileFields {
      user,
      company: self.company,
      website,
      location: self.location,
      bio: self.bio,
      status: self.status,
      skills: self.skills.into_skills(),
      githubusername: self.githubusername,
      social: Social {
        medium:    truthy(self.medium),
        twitter:   truthy(self.twitter),
        facebook:  truthy(self.facebook),
        linkedin:  truthy(self.linkedin),
        instagram: truthy(self.instagram),
        github:    truthy(self.github),
      },
    })
  }
}

/// Deserialize an already-validated body, reporting type mismatches as 400.
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ApiError> {
  serde_json::from_value(body).map_err(|e| ApiError::BadRequest(format!("Malformed request body: {e}")))
}

// ─── Get current ──────────────────────────────────────────────────────────────

/// `GET /me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
) -> Result<Json<PopulatedProfile>, ApiError>
where
  S: ProfileStore + Clone + 'static,
{
  let profile = state
    .store
    .find_profile(user_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::BadRequest(NO_PROFILE.into()))?;
  Ok(Json(profile))
}

// ─── Create / update ──────────────────────────────────────────────────────────

/// `POST /`: create the caller's profile, or replace its fields.
pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
  JsonBody(body): JsonBody,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + Clone + 'static,
{
  let errors = validate(&body, &[
    check("status", "Status is required").not_empty(),
    check("skills", "Skills is required").not_empty(),
  ]);
  if !errors.is_empty() {
    return Err(ApiError::Validation(errors));
  }

  let fields = parse_body::<ProfileBody>(body)?.into_fields(user_id)?;
  let profile = state
    .store
    .upsert_profile(fields)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(user_id = %user_id, profile_id = %profile.id, "profile saved");
  Ok(Json(profile))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<PopulatedProfile>>, ApiError>
where
  S: ProfileStore + Clone + 'static,
{
  let profiles = state
    .store
    .list_profiles()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(profiles))
}

// ─── Get by user ──────────────────────────────────────────────────────────────

/// `GET /user/{user_id}`. A malformed id is reported like a missing profile.
pub async fn by_user<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<PopulatedProfile>, ApiError>
where
  S: ProfileStore + Clone + 'static,
{
  let user_id = Uuid::parse_str(&user_id)
    .map_err(|_| ApiError::BadRequest(PROFILE_NOT_FOUND.into()))?;

  let profile = state
    .store
    .find_profile(user_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::BadRequest(PROFILE_NOT_FOUND.into()))?;
  Ok(Json(profile))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /`: remove the caller's profile and user record together.
pub async fn delete_account<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, ApiError>
where
  S: ProfileStore + Clone + 'static,
{
  let removed = state
    .store
    .delete_account(user_id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(user_id = %user_id, removed, "account deleted");
  Ok(Json(json!({ "msg": "User Deleted" })))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn body(extra: Value) -> ProfileBody {
    let mut base = json!({ "status": "Developer", "skills": "rust" });
    if let (Value::Object(b), Value::Object(e)) = (&mut base, extra) {
      b.extend(e);
    }
    serde_json::from_value(base).unwrap()
  }

  #[test]
  fn delimited_skills_keep_leading_space() {
    let skills = SkillsInput::Delimited("go, rust".into()).into_skills();
    assert_eq!(skills, vec![" go", " rust"]);
  }

  #[test]
  fn listed_skills_are_unchanged() {
    let skills = SkillsInput::List(vec!["go".into(), "rust".into()]).into_skills();
    assert_eq!(skills, vec!["go", "rust"]);
  }

  #[test]
  fn skills_accept_both_shapes() {
    let list: SkillsInput = serde_json::from_value(json!(["a", "b"])).unwrap();
    assert!(matches!(list, SkillsInput::List(_)));
    let delimited: SkillsInput = serde_json::from_value(json!("a,b")).unwrap();
    assert!(matches!(delimited, SkillsInput::Delimited(_)));
  }

  #[test]
  fn social_only_keeps_truthy_links() {
    let fields = body(json!({ "github": "https://github.com/ada", "twitter": "", "medium": null }))
      .into_fields(Uuid::new_v4())
      .unwrap();
    assert_eq!(fields.social, Social {
      github: Some("https://github.com/ada".into()),
      ..Social::default()
    });
  }

  #[test]
  fn website_rules() {
    let user = Uuid::new_v4();
    let empty = body(json!({ "website": "" })).into_fields(user).unwrap();
    assert_eq!(empty.website.as_deref(), Some(""));

    let bare = body(json!({ "website": "example.com" })).into_fields(user).unwrap();
    assert_eq!(bare.website.as_deref(), Some("https://example.com"));

    let absent = body(json!({})).into_fields(user).unwrap();
    assert_eq!(absent.website, None);

    let bad = body(json!({ "website": "http://" })).into_fields(user).unwrap_err();
    assert!(matches!(bad, ApiError::Validation(v) if v[0].param == "website"));
  }
}
