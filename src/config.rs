use std::env;
use std::net::SocketAddr;

use tracing::info;

use crate::error::AppError;
use crate::session::DEFAULT_SESSION_TTL_SECS;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendConfig {
    Supabase { url: String, anon_key: String },
    Sqlite { database_url: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend: BackendConfig,
    pub session_ttl_secs: u32,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so it can be exercised
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| {
                info!("BIND_ADDR not set, using default: 127.0.0.1:3000");
                "127.0.0.1:3000".to_string()
            })
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("invalid BIND_ADDR: {}", e)))?;

        let mode = lookup("BACKEND").unwrap_or_else(|| "supabase".to_string());
        let backend = match mode.as_str() {
            "supabase" => {
                let url = lookup("SUPABASE_URL")
                    .ok_or_else(|| AppError::Config("SUPABASE_URL is not set".to_string()))?;
                let anon_key = lookup("SUPABASE_ANON_KEY")
                    .ok_or_else(|| AppError::Config("SUPABASE_ANON_KEY is not set".to_string()))?;
                BackendConfig::Supabase {
                    url: url.trim_end_matches('/').to_string(),
                    anon_key,
                }
            }
            "sqlite" => BackendConfig::Sqlite {
                database_url: lookup("DATABASE_URL")
                    .unwrap_or_else(|| "sqlite://attendance.db?mode=rwc".to_string()),
            },
            other => {
                return Err(AppError::Config(format!(
                    "unknown BACKEND '{}', expected 'supabase' or 'sqlite'",
                    other
                )));
            }
        };

        let session_ttl_secs = match lookup("SESSION_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| AppError::Config(format!("invalid SESSION_TTL_SECS: {}", e)))?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        Ok(Self {
            bind_addr,
            backend,
            session_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_supabase_config() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://example.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .expect("config should load");

        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.session_ttl_secs, 3600);
        assert_eq!(
            config.backend,
            BackendConfig::Supabase {
                url: "https://example.supabase.co".to_string(),
                anon_key: "anon".to_string(),
            }
        );
    }

    #[test]
    fn test_supabase_requires_url() {
        let err = AppConfig::from_lookup(lookup(&[("SUPABASE_ANON_KEY", "anon")])).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("SUPABASE_URL")));
    }

    #[test]
    fn test_sqlite_config() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BACKEND", "sqlite"),
            ("BIND_ADDR", "0.0.0.0:8080"),
        ]))
        .expect("config should load");

        assert_eq!(config.bind_addr.port(), 8080);
        assert!(matches!(config.backend, BackendConfig::Sqlite { .. }));
    }

    #[test]
    fn test_session_ttl() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BACKEND", "sqlite"),
            ("SESSION_TTL_SECS", "600"),
        ]))
        .expect("config should load");
        assert_eq!(config.session_ttl_secs, 600);

        let err = AppConfig::from_lookup(lookup(&[
            ("BACKEND", "sqlite"),
            ("SESSION_TTL_SECS", "an hour"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("SESSION_TTL_SECS")));
    }

    #[test]
    fn test_unknown_backend() {
        assert!(AppConfig::from_lookup(lookup(&[("BACKEND", "mongo")])).is_err());
    }
}
