//! JSON REST API for Folio profiles.
//!
//! Exposes an axum [`Router`] backed by any [`folio_core::store::ProfileStore`].
//! Token verification is built in; TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/profile", folio_api::api_router(state))
//! ```

pub mod auth;
pub mod education;
pub mod error;
pub mod experience;
pub mod normalize;
pub mod profiles;
pub mod validate;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, put},
};
use folio_core::store::ProfileStore;

pub use auth::{AuthConfig, AuthUser};
pub use error::ApiError;

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ProfileStore + Clone + 'static,
{
  Router::new()
    // Profiles
    .route(
      "/",
      get(profiles::list::<S>)
        .post(profiles::upsert::<S>)
        .delete(profiles::delete_account::<S>),
    )
    .route("/me", get(profiles::me::<S>))
    .route("/user/{user_id}", get(profiles::by_user::<S>))
    // Embedded lists
    .route("/experience", put(experience::add::<S>))
    .route("/experience/{index}", delete(experience::remove::<S>))
    .route("/education", put(education::add::<S>))
    .route("/education/{index}", delete(education::remove::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
