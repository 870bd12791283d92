//! Backend entry-point: wires the document store, session middleware, and
//! the server-rendered route chains.

use std::env;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DocumentStore, MongoCommentRepository, MongoDiscussionRepository, MongoUserRepository,
    StoreConfig,
};
use backend::outbound::security::{Argon2CredentialHasher, StoreLoginService};
use backend::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let store_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "mongodb://127.0.0.1:27017".into());
    let mut store_config = StoreConfig::new(store_url);
    if let Ok(name) = env::var("DATABASE_NAME") {
        store_config = store_config.with_database(name);
    }
    let store = DocumentStore::connect(&store_config)
        .await
        .map_err(|e| std::io::Error::other(format!("document store: {e}")))?;

    let users = Arc::new(MongoUserRepository::new(store.clone()));
    let hasher = Arc::new(Argon2CredentialHasher);
    let state = HttpState {
        users: users.clone(),
        discussions: Arc::new(MongoDiscussionRepository::new(store.clone())),
        comments: Arc::new(MongoCommentRepository::new(store)),
        login: Arc::new(StoreLoginService::new(users, hasher.clone())),
        hasher,
    };

    let bind_addr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr, state);
    create_server(health_state, config)?.await
}

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}
