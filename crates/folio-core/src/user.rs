//! User accounts referenced by profiles.
//!
//! Users are owned by the account side of the system. Profiles hold a foreign
//! key to a user and, on read, carry a [`UserSummary`] with the handful of
//! fields clients display next to a profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  #[serde(rename = "_id")]
  pub id:     Uuid,
  pub name:   String,
  pub email:  String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar: Option<String>,
  pub date:   DateTime<Utc>,
}

impl User {
  /// The fields attached to a profile when the user reference is populated.
  pub fn summary(&self) -> UserSummary {
    UserSummary {
      id:     self.id,
      name:   self.name.clone(),
      avatar: self.avatar.clone(),
    }
  }
}

/// Input for creating a user. The id and join date are assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub name:   String,
  pub email:  String,
  pub avatar: Option<String>,
}

/// Populated view of a user: `{ _id, name, avatar }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  #[serde(rename = "_id")]
  pub id:     Uuid,
  pub name:   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar: Option<String>,
}
