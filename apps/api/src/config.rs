use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::advice::classifier::ClassifierBackend;

const DEFAULT_SESSION_TTL_SECS: u32 = 24 * 60 * 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `career_model.json` and `label_encoder.json`.
    pub model_dir: PathBuf,
    pub classifier_backend: ClassifierBackend,
    /// When set, users are kept in PostgreSQL instead of process memory.
    pub database_url: Option<String>,
    pub session_cookie: String,
    /// Seconds a session stays valid after signup or login.
    pub session_ttl_secs: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let classifier_backend = match optional_env("CLASSIFIER_BACKEND").as_deref() {
            None | Some("tree") => ClassifierBackend::TreeEnsemble,
            Some("rules") => ClassifierBackend::RuleBased,
            Some(other) => bail!("CLASSIFIER_BACKEND must be 'tree' or 'rules', got '{other}'"),
        };

        Ok(Config {
            model_dir: optional_env("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("models")),
            classifier_backend,
            database_url: optional_env("DATABASE_URL"),
            session_cookie: optional_env("SESSION_COOKIE")
                .unwrap_or_else(|| "session".to_string()),
            session_ttl_secs: optional_env("SESSION_TTL_SECS")
                .unwrap_or_else(|| DEFAULT_SESSION_TTL_SECS.to_string())
                .parse::<u32>()
                .context("SESSION_TTL_SECS must be a non-negative number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Config {
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::from(self.session_ttl_secs))
    }
}

/// Reads an env var, treating an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    /// In-memory store, bundled artifacts, default cookie name.
    pub fn for_tests() -> Self {
        Config {
            model_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/models")),
            classifier_backend: ClassifierBackend::TreeEnsemble,
            database_url: None,
            session_cookie: "session".to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
