pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;
pub mod views;

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use crate::backend::{LocalAuth, SqliteStore, SupabaseClient, SupabaseConfig};
use crate::config::{AppConfig, BackendConfig};
use crate::error::AppError;
use crate::session::SessionStore;
use crate::state::AppState;

/// Wires the configured backend into the application state.
pub async fn build_state(config: &AppConfig) -> Result<AppState, AppError> {
    let sessions = SessionStore::with_ttl(Duration::seconds(i64::from(config.session_ttl_secs)));
    let state = match &config.backend {
        BackendConfig::Supabase { url, anon_key } => {
            info!("using hosted backend at {}", url);
            let client = Arc::new(SupabaseClient::new(SupabaseConfig {
                url: url.clone(),
                anon_key: anon_key.clone(),
            })?);
            AppState::new(client.clone(), client)?
        }
        BackendConfig::Sqlite { database_url } => {
            info!("using local sqlite backend at {}", database_url);
            let store = Arc::new(SqliteStore::connect(database_url).await?);
            AppState::new(store, Arc::new(LocalAuth))?
        }
    };
    Ok(state.with_sessions(sessions))
}
