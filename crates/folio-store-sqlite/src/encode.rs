//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Skills, embedded lists and
//! the social object are stored as compact JSON. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use folio_core::{
  profile::{PopulatedProfile, Profile},
  user::{User, UserSummary},
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: DeserializeOwned>(s: &str) -> Result<T> {
  Ok(serde_json::from_str(s)?)
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// A `users` row as read from SQLite.
pub struct RawUser {
  pub user_id:   String,
  pub name:      String,
  pub email:     String,
  pub avatar:    Option<String>,
  pub joined_at: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:   row.get(0)?,
      name:      row.get(1)?,
      email:     row.get(2)?,
      avatar:    row.get(3)?,
      joined_at: row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:     decode_uuid(&self.user_id)?,
      name:   self.name,
      email:  self.email,
      avatar: self.avatar,
      date:   decode_dt(&self.joined_at)?,
    })
  }
}

/// A `profiles` row as read from SQLite, columns in
/// [`PROFILE_COLUMNS`](crate::schema::PROFILE_COLUMNS) order.
pub struct RawProfile {
  pub profile_id:     String,
  pub user_id:        String,
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub status:         String,
  pub skills:         String,
  pub bio:            Option<String>,
  pub githubusername: Option<String>,
  pub experience:     String,
  pub education:      String,
  pub social:         String,
  pub created_at:     String,
}

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id:     row.get(0)?,
      user_id:        row.get(1)?,
      company:        row.get(2)?,
      website:        row.get(3)?,
      location:       row.get(4)?,
      status:         row.get(5)?,
      skills:         row.get(6)?,
      bio:            row.get(7)?,
      githubusername: row.get(8)?,
      experience:     row.get(9)?,
      education:      row.get(10)?,
      social:         row.get(11)?,
      created_at:     row.get(12)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      id:             decode_uuid(&self.profile_id)?,
      user:           decode_uuid(&self.user_id)?,
      company:        self.company,
      website:        self.website,
      location:       self.location,
      status:         self.status,
      skills:         decode_json(&self.skills)?,
      bio:            self.bio,
      githubusername: self.githubusername,
      experience:     decode_json(&self.experience)?,
      education:      decode_json(&self.education)?,
      social:         decode_json(&self.social)?,
      date:           decode_dt(&self.created_at)?,
    })
  }
}

/// A profile row joined with the owning user's name and avatar.
pub struct RawPopulatedProfile {
  pub profile: RawProfile,
  pub name:    String,
  pub avatar:  Option<String>,
}

impl RawPopulatedProfile {
  /// Reads the profile columns followed by `name, avatar`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile: RawProfile::from_row(row)?,
      name:    row.get(13)?,
      avatar:  row.get(14)?,
    })
  }

  pub fn into_profile(self) -> Result<PopulatedProfile> {
    let profile = self.profile.into_profile()?;
    let summary = UserSummary {
      id:     profile.user,
      name:   self.name,
      avatar: self.avatar,
    };
    Ok(profile.with_user(summary))
  }
}
