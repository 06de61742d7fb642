//! Bearer-token authentication: token issuing, verification and the
//! [`AuthUser`] extractor.
//!
//! Tokens are HS256 JWTs whose `sub` claim is the user id. Clients send them
//! in the `x-auth-token` header or as `Authorization: Bearer <token>`.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use chrono::{Duration, Utc};
use folio_core::store::ProfileStore;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub const TOKEN_HEADER: &str = "x-auth-token";

const NO_TOKEN: &str = "No token, authorization denied";
const BAD_TOKEN: &str = "Token is not valid";

/// JWT claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  /// The authenticated user's id.
  pub sub: Uuid,
  pub iat: i64,
  pub exp: i64,
}

/// Signing material and token lifetime for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  encoding:      EncodingKey,
  decoding:      DecodingKey,
  pub token_ttl: Duration,
}

impl AuthConfig {
  pub fn new(secret: &str, token_ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      token_ttl,
    }
  }

  /// Sign a token for `user_id` valid for [`Self::token_ttl`].
  pub fn issue(&self, user_id: Uuid) -> jsonwebtoken::errors::Result<String> {
    let now = Utc::now();
    let claims = Claims {
      sub: user_id,
      iat: now.timestamp(),
      exp: (now + self.token_ttl).timestamp(),
    };
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
  }

  /// Check the signature and expiry of `token` and return its subject.
  pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Uuid> {
    let validation = Validation::new(Algorithm::HS256);
    let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?;
    Ok(data.claims.sub)
  }
}

/// The verified identity of the caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
  if let Some(token) = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
    return Some(token.trim());
  }
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
}

/// Verify the caller's token directly from headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<Uuid, ApiError> {
  let token = token_from_headers(headers)
    .filter(|t| !t.is_empty())
    .ok_or_else(|| ApiError::Unauthorized(NO_TOKEN.into()))?;

  config.verify(token).map_err(|e| {
    tracing::debug!(error = %e, "token rejected");
    ApiError::Unauthorized(BAD_TOKEN.into())
  })
}

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: ProfileStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_auth(&parts.headers, &state.auth).map(AuthUser)
  }
}
