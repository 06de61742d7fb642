//! folio-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the profile API over HTTP.
//!
//! # Creating accounts
//!
//! Account registration lives outside this service. For local use:
//!
//! ```text
//! folio-server add-user --name "Ada Lovelace" --email ada@example.com
//! folio-server issue-token --user <uuid>
//! ```

mod avatar;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::{Router, routing::get};
use clap::{Parser, Subcommand};
use folio_api::{AppState, AuthConfig};
use folio_core::{store::ProfileStore, user::NewUser};
use folio_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Folio profile server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Register a user and print its id and an access token.
  AddUser {
    #[arg(long)]
    name:  String,
    #[arg(long)]
    email: String,
  },
  /// Print an access token for an existing user.
  IssueToken {
    #[arg(long)]
    user: Uuid,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  // Open SQLite store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  // Build application state.
  let state = AppState {
    store: Arc::new(store),
    auth:  Arc::new(AuthConfig::new(&server_cfg.jwt_secret, server_cfg.token_ttl())),
  };

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(state, &server_cfg).await,
    Command::AddUser { name, email } => add_user(&state, name, email).await,
    Command::IssueToken { user } => issue_token(&state, user).await,
  }
}

async fn serve(state: AppState<SqliteStore>, cfg: &ServerConfig) -> anyhow::Result<()> {
  let app = app(state, &cfg.base_path);
  let address = cfg.address();

  tracing::info!(base_path = %cfg.base_path, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// The full application: `/health` at the root and the API under `base_path`.
fn app<S>(state: AppState<S>, base_path: &str) -> Router
where
  S: ProfileStore + Clone + 'static,
{
  let api = folio_api::api_router(state);
  let base = base_path.trim_matches('/');

  let router = Router::new().route("/health", get(|| async { "ok" }));
  // `nest` rejects the root path, so an empty prefix merges instead.
  let router = if base.is_empty() {
    router.merge(api)
  } else {
    router.nest(&format!("/{base}"), api)
  };
  router.layer(TraceLayer::new_for_http())
}

async fn add_user(state: &AppState<SqliteStore>, name: String, email: String) -> anyhow::Result<()> {
  let avatar = avatar::gravatar_url(&email);
  let user = state
    .store
    .add_user(NewUser { name, email, avatar: Some(avatar) })
    .await
    .context("failed to add user")?;
  let token = state.auth.issue(user.id).context("failed to sign token")?;

  tracing::info!(user_id = %user.id, "user added");
  println!("id:    {}", user.id);
  println!("token: {token}");
  Ok(())
}

async fn issue_token(state: &AppState<SqliteStore>, user_id: Uuid) -> anyhow::Result<()> {
  let user = state
    .store
    .get_user(user_id)
    .await
    .context("failed to look up user")?
    .with_context(|| format!("no user with id {user_id}"))?;
  let token = state.auth.issue(user.id).context("failed to sign token")?;
  println!("{token}");
  Ok(())
}
