//! Gravatar URLs for newly registered users.

use sha2::{Digest, Sha256};

/// Gravatar image URL for `email`: 200px, PG-rated, mystery-person fallback.
pub fn gravatar_url(email: &str) -> String {
  let hash = hex::encode(Sha256::digest(email.trim().to_lowercase().as_bytes()));
  format!("https://www.gravatar.com/avatar/{hash}?s=200&r=pg&d=mm")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_ignores_case_and_surrounding_space() {
    assert_eq!(gravatar_url("Ada@Example.com "), gravatar_url("ada@example.com"));
  }

  #[test]
  fn url_shape() {
    let url = gravatar_url("ada@example.com");
    let hash = url
      .strip_prefix("https://www.gravatar.com/avatar/")
      .and_then(|rest| rest.strip_suffix("?s=200&r=pg&d=mm"))
      .unwrap();
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
  }
}
