//! Server configuration.
//!
//! Layered, lowest precedence first: built-in defaults, the TOML file given
//! with `--config` (optional), then `FOLIO_*` environment variables.
//!
//! ```toml
//! host           = "0.0.0.0"
//! port           = 5000
//! base_path      = "/api/profile"
//! store_path     = "~/.local/share/folio/folio.db"
//! jwt_secret     = "change-me"
//! token_ttl_secs = 360000
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Server configuration loaded from `config.toml` and the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  /// Path prefix the profile API is mounted under.
  pub base_path:      String,
  pub store_path:     PathBuf,
  /// HS256 signing secret. Has no default.
  pub jwt_secret:     String,
  pub token_ttl_secs: i64,
}

impl ServerConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 5000)?
      .set_default("base_path", "/api/profile")?
      .set_default("store_path", "folio.db")?
      .set_default("token_ttl_secs", 360_000)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FOLIO"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;

    if cfg.jwt_secret.is_empty() {
      anyhow::bail!("jwt_secret must not be empty");
    }
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn token_ttl(&self) -> chrono::Duration { chrono::Duration::seconds(self.token_ttl_secs) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write_config(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("folio-{name}-{}.toml", std::process::id()));
    std::fs::write(&path, body).unwrap();
    path
  }

  #[test]
  fn file_values_override_defaults() {
    let path = write_config("override", "port = 8080\njwt_secret = \"s3cret\"\n");
    let cfg = ServerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.jwt_secret, "s3cret");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.base_path, "/api/profile");
    assert_eq!(cfg.token_ttl(), chrono::Duration::seconds(360_000));
  }

  #[test]
  fn empty_secret_is_rejected() {
    let path = write_config("empty-secret", "jwt_secret = \"\"\n");
    let result = ServerConfig::load(&path);
    std::fs::remove_file(&path).ok();
    assert!(result.is_err());
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/folio.db")),
      PathBuf::from(home).join("folio.db")
    );
    assert_eq!(expand_tilde(Path::new("/tmp/folio.db")), PathBuf::from("/tmp/folio.db"));
  }
}
