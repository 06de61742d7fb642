//! Profile documents and their embedded records.
//!
//! A profile is a single document per user. Work history and education are
//! embedded by value: entries have no identity beyond their list position and
//! no lifecycle independent of the parent profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, user::UserSummary};

// ─── Embedded records ────────────────────────────────────────────────────────

/// One entry of a profile's work history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
  pub title:       String,
  pub company:     String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location:    Option<String>,
  pub from:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub to:          Option<DateTime<Utc>>,
  #[serde(default)]
  pub current:     bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

impl Experience {
  /// Reject an entry missing `title`, `company` or `from`.
  pub fn check(&self) -> Result<()> {
    require("title", &self.title)?;
    require("company", &self.company)?;
    require("from", &self.from)
  }
}

/// One entry of a profile's education history. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub school:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub degree:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fieldofstudy: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub from:         Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub to:           Option<DateTime<Utc>>,
  #[serde(default)]
  pub current:      bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:  Option<String>,
}

/// The fixed set of social links. Unset links are omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub medium:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub twitter:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub facebook:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub linkedin:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub instagram: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub github:    Option<String>,
}

impl Social {
  pub fn is_empty(&self) -> bool { *self == Social::default() }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// A stored profile document.
///
/// `U` is the shape of the user reference: the bare user id by default, or a
/// [`UserSummary`] when the reference has been populated for a read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile<U = Uuid> {
  #[serde(rename = "_id")]
  pub id:             Uuid,
  pub user:           U,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub company:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub website:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location:       Option<String>,
  pub status:         String,
  pub skills:         Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bio:            Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub githubusername: Option<String>,
  #[serde(default)]
  pub experience:     Vec<Experience>,
  #[serde(default)]
  pub education:      Vec<Education>,
  #[serde(default)]
  pub social:         Social,
  /// Set when the profile is first created; never changed by later upserts.
  pub date:           DateTime<Utc>,
}

/// A profile whose user reference carries the user's name and avatar.
pub type PopulatedProfile = Profile<UserSummary>;

impl<U> Profile<U> {
  /// Swap the user reference, keeping every other field.
  pub fn with_user<V>(self, user: V) -> Profile<V> {
    Profile {
      id: self.id,
      user,
      company: self.company,
      website: self.website,
      location: self.location,
      status: self.status,
      skills: self.skills,
      bio: self.bio,
      githubusername: self.githubusername,
      experience: self.experience,
      education: self.education,
      social: self.social,
      date: self.date,
    }
  }
}

// ─── Write input ─────────────────────────────────────────────────────────────

/// The header fields written by a profile upsert.
///
/// Every field here is replaced wholesale on update; `experience`,
/// `education`, the profile id and the creation date are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
  pub user:           Uuid,
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub bio:            Option<String>,
  pub status:         String,
  pub skills:         Vec<String>,
  pub githubusername: Option<String>,
  pub social:         Social,
}

impl ProfileFields {
  /// Reject a document missing `status` or `skills`.
  pub fn check(&self) -> Result<()> {
    require("status", &self.status)?;
    if self.skills.is_empty() {
      return Err(Error::MissingField("skills"));
    }
    Ok(())
  }
}

fn require(field: &'static str, value: &str) -> Result<()> {
  if value.is_empty() {
    Err(Error::MissingField(field))
  } else {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fields() -> ProfileFields {
    ProfileFields {
      user:           Uuid::new_v4(),
      company:        None,
      website:        None,
      location:       None,
      bio:            None,
      status:         "Developer".into(),
      skills:         vec!["rust".into()],
      githubusername: None,
      social:         Social::default(),
    }
  }

  #[test]
  fn fields_require_status_and_skills() {
    assert!(fields().check().is_ok());

    let mut no_status = fields();
    no_status.status.clear();
    assert!(matches!(no_status.check(), Err(Error::MissingField("status"))));

    let mut no_skills = fields();
    no_skills.skills.clear();
    assert!(matches!(no_skills.check(), Err(Error::MissingField("skills"))));
  }

  #[test]
  fn experience_requires_title_company_from() {
    let exp = Experience {
      title:       "Engineer".into(),
      company:     "Acme".into(),
      location:    None,
      from:        "2020-01-01".into(),
      to:          None,
      current:     true,
      description: None,
    };
    assert!(exp.check().is_ok());

    let missing_from = Experience { from: String::new(), ..exp };
    assert!(matches!(missing_from.check(), Err(Error::MissingField("from"))));
  }

  #[test]
  fn experience_current_defaults_to_false() {
    let exp: Experience = serde_json::from_str(
      r#"{"title":"Engineer","company":"Acme","from":"2020-01-01"}"#,
    )
    .unwrap();
    assert!(!exp.current);
  }

  #[test]
  fn populated_user_serializes_as_object() {
    let user = UserSummary {
      id:     Uuid::new_v4(),
      name:   "Ada".into(),
      avatar: Some("https://example.com/a.png".into()),
    };
    let profile = Profile {
      id:             Uuid::new_v4(),
      user:           user.id,
      company:        None,
      website:        None,
      location:       None,
      status:         "Developer".into(),
      skills:         vec!["rust".into()],
      bio:            None,
      githubusername: None,
      experience:     vec![],
      education:      vec![],
      social:         Social { github: Some("ada".into()), ..Social::default() },
      date:           Utc::now(),
    };

    let bare = serde_json::to_value(&profile).unwrap();
    assert_eq!(bare["user"], serde_json::json!(user.id));
    assert_eq!(bare["social"], serde_json::json!({ "github": "ada" }));
    assert!(bare.get("company").is_none());

    let populated = serde_json::to_value(profile.with_user(user.clone())).unwrap();
    assert_eq!(populated["user"]["name"], "Ada");
    assert_eq!(populated["user"]["_id"], serde_json::json!(user.id));
  }
}
