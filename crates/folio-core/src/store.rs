//! The `ProfileStore` trait and error classification.
//!
//! The trait is implemented by storage backends (e.g. `folio-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  profile::{Education, Experience, PopulatedProfile, Profile, ProfileFields},
  user::{NewUser, User},
};

// ─── Classification ──────────────────────────────────────────────────────────

/// Coarse category of a store failure, used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A referenced record does not exist.
  NotFound,
  /// A uniqueness or integrity constraint rejected the write.
  Conflict,
  /// The document failed the store's own validation.
  Invalid,
  /// The backend is temporarily unable to serve the request.
  Transient,
  /// Anything else.
  Fatal,
}

/// Implemented by store error types so callers can react by category.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

impl Classify for crate::Error {
  fn kind(&self) -> ErrorKind {
    match self {
      crate::Error::MissingField(_) => ErrorKind::Invalid,
      crate::Error::UserNotFound(_) => ErrorKind::NotFound,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Folio document store backend.
///
/// Each method is a single store operation; none of them coordinate with
/// concurrent callers beyond what the backend itself guarantees.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ProfileStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a user. Fails with a conflict if the email is taken.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Find the profile owned by `user_id`, with the user reference populated.
  fn find_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<PopulatedProfile>, Self::Error>> + Send + '_;

  /// All profiles in creation order, with user references populated.
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<PopulatedProfile>, Self::Error>> + Send + '_;

  /// Create the profile for `fields.user`, or replace its header fields if
  /// one exists. The profile id, creation date, experience and education of
  /// an existing profile are preserved.
  fn upsert_profile(
    &self,
    fields: ProfileFields,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  // ── Embedded lists ────────────────────────────────────────────────────

  /// Prepend a work-history entry. Returns `None` if the user has no profile.
  fn add_experience(
    &self,
    user_id: Uuid,
    entry: Experience,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Remove the work-history entry at `index`. An out-of-range index leaves
  /// the list unchanged. Returns `None` if the user has no profile.
  fn remove_experience(
    &self,
    user_id: Uuid,
    index: usize,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Prepend an education entry. Returns `None` if the user has no profile.
  fn add_education(
    &self,
    user_id: Uuid,
    entry: Education,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Remove the education entry at `index`; see [`Self::remove_experience`].
  fn remove_education(
    &self,
    user_id: Uuid,
    index: usize,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  // ── Account removal ───────────────────────────────────────────────────

  /// Delete the user's profile and the user record as one atomic unit.
  /// Returns whether a user record was removed.
  fn delete_account(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
