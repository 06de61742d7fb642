//! [`SqliteStore`], the SQLite implementation of [`ProfileStore`].

use std::path::Path;

use chrono::Utc;
use folio_core::{
  profile::{Education, Experience, PopulatedProfile, Profile, ProfileFields},
  store::ProfileStore,
  user::{NewUser, User},
};
use rusqlite::OptionalExtension as _;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{RawPopulatedProfile, RawProfile, RawUser, encode_dt, encode_json, encode_uuid},
  schema::{PROFILE_COLUMNS, SCHEMA},
};

/// The embedded-list columns of the `profiles` table.
#[derive(Debug, Clone, Copy)]
enum ListColumn {
  Experience,
  Education,
}

impl ListColumn {
  fn name(self) -> &'static str {
    match self {
      ListColumn::Experience => "experience",
      ListColumn::Education => "education",
    }
  }
}

fn json_in_call(e: serde_json::Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folio profile store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read-modify-write one embedded list inside a single transaction.
  ///
  /// Returns `None` without writing if the user has no profile.
  async fn edit_list<T, F>(
    &self,
    user_id: Uuid,
    column: ListColumn,
    edit: F,
  ) -> Result<Option<Profile>>
  where
    T: Serialize + DeserializeOwned + Send + 'static,
    F: FnOnce(&mut Vec<T>) + Send + 'static,
  {
    let user_id_str = encode_uuid(user_id);
    let col         = column.name();

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let current: Option<String> = tx
          .query_row(
            &format!("SELECT {col} FROM profiles WHERE user_id = ?1"),
            rusqlite::params![user_id_str],
            |row| row.get(0),
          )
          .optional()?;
        let Some(current) = current else {
          return Ok(None);
        };

        let mut list: Vec<T> = serde_json::from_str(&current).map_err(json_in_call)?;
        edit(&mut list);
        let updated = serde_json::to_string(&list).map_err(json_in_call)?;

        let raw = tx.query_row(
          &format!(
            "UPDATE profiles SET {col} = ?2 WHERE user_id = ?1 RETURNING {PROFILE_COLUMNS}"
          ),
          rusqlite::params![user_id_str, updated],
          RawProfile::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }
}

// ─── ProfileStore impl ───────────────────────────────────────────────────────

impl ProfileStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      id:     Uuid::new_v4(),
      name:   input.name,
      email:  input.email,
      avatar: input.avatar,
      date:   Utc::now(),
    };

    let id_str    = encode_uuid(user.id);
    let name      = user.name.clone();
    let email     = user.email.clone();
    let avatar    = user.avatar.clone();
    let at_str    = encode_dt(user.date);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO users (user_id, name, email, avatar, joined_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, email, avatar, at_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::DuplicateEmail(user.email));
    }
    tracing::debug!(user_id = %user.id, "user created");
    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, name, email, avatar, joined_at FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn find_profile(&self, user_id: Uuid) -> Result<Option<PopulatedProfile>> {
    let user_id_str = encode_uuid(user_id);

    let raw: Option<RawPopulatedProfile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {PROFILE_COLUMNS}, name, avatar
               FROM profiles JOIN users USING (user_id)
               WHERE user_id = ?1"
            ),
            rusqlite::params![user_id_str],
            RawPopulatedProfile::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPopulatedProfile::into_profile).transpose()
  }

  async fn list_profiles(&self) -> Result<Vec<PopulatedProfile>> {
    let raws: Vec<RawPopulatedProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLUMNS}, name, avatar
           FROM profiles JOIN users USING (user_id)
           ORDER BY profiles.rowid"
        ))?;
        let rows = stmt
          .query_map([], RawPopulatedProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPopulatedProfile::into_profile).collect()
  }

  async fn upsert_profile(&self, fields: ProfileFields) -> Result<Profile> {
    fields.check()?;

    let user_id        = fields.user;
    let profile_id_str = encode_uuid(Uuid::new_v4());
    let user_id_str    = encode_uuid(user_id);
    let skills_str     = encode_json(&fields.skills)?;
    let social_str     = encode_json(&fields.social)?;
    let created_at_str = encode_dt(Utc::now());
    let ProfileFields {
      company,
      website,
      location,
      bio,
      status,
      githubusername,
      ..
    } = fields;

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let user_exists = tx
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![user_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !user_exists {
          return Ok(None);
        }

        let raw = tx.query_row(
          &format!(
            "INSERT INTO profiles (
               profile_id, user_id, company, website, location, status,
               skills, bio, githubusername, social, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT (user_id) DO UPDATE SET
               company        = excluded.company,
               website        = excluded.website,
               location       = excluded.location,
               status         = excluded.status,
               skills         = excluded.skills,
               bio            = excluded.bio,
               githubusername = excluded.githubusername,
               social         = excluded.social
             RETURNING {PROFILE_COLUMNS}"
          ),
          rusqlite::params![
            profile_id_str,
            user_id_str,
            company,
            website,
            location,
            status,
            skills_str,
            bio,
            githubusername,
            social_str,
            created_at_str,
          ],
          RawProfile::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    let profile = raw.ok_or(folio_core::Error::UserNotFound(user_id))?.into_profile()?;
    tracing::debug!(user_id = %user_id, profile_id = %profile.id, "profile upserted");
    Ok(profile)
  }

  // ── Embedded lists ────────────────────────────────────────────────────────

  async fn add_experience(&self, user_id: Uuid, entry: Experience) -> Result<Option<Profile>> {
    entry.check()?;
    self
      .edit_list(user_id, ListColumn::Experience, move |list: &mut Vec<Experience>| {
        list.insert(0, entry);
      })
      .await
  }

  async fn remove_experience(&self, user_id: Uuid, index: usize) -> Result<Option<Profile>> {
    self
      .edit_list(user_id, ListColumn::Experience, move |list: &mut Vec<Experience>| {
        if index < list.len() {
          list.remove(index);
        }
      })
      .await
  }

  async fn add_education(&self, user_id: Uuid, entry: Education) -> Result<Option<Profile>> {
    self
      .edit_list(user_id, ListColumn::Education, move |list: &mut Vec<Education>| {
        list.insert(0, entry);
      })
      .await
  }

  async fn remove_education(&self, user_id: Uuid, index: usize) -> Result<Option<Profile>> {
    self
      .edit_list(user_id, ListColumn::Education, move |list: &mut Vec<Education>| {
        if index < list.len() {
          list.remove(index);
        }
      })
      .await
  }

  // ── Account removal ───────────────────────────────────────────────────────

  async fn delete_account(&self, user_id: Uuid) -> Result<bool> {
    let user_id_str = encode_uuid(user_id);

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM profiles WHERE user_id = ?1",
          rusqlite::params![user_id_str],
        )?;
        let users = tx.execute(
          "DELETE FROM users WHERE user_id = ?1",
          rusqlite::params![user_id_str],
        )?;
        tx.commit()?;
        Ok(users > 0)
      })
      .await?;

    tracing::debug!(user_id = %user_id, removed, "account deleted");
    Ok(removed)
  }
}
