use anyhow::{Context, Result};
use std::time::Duration;

use crate::similarity::engine::DEFAULT_THRESHOLD;

/// Which posts feed the similarity corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorpusPolicy {
    /// Every post, soft-deleted ones included.
    #[default]
    All,
    /// Only posts that are not soft-deleted.
    Active,
}

impl CorpusPolicy {
    pub fn include_deleted(self) -> bool {
        matches!(self, CorpusPolicy::All)
    }
}

impl std::str::FromStr for CorpusPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(CorpusPolicy::All),
            "active" => Ok(CorpusPolicy::Active),
            other => anyhow::bail!("unknown similarity corpus policy '{other}' (expected 'all' or 'active')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub db_max_connections: u32,
    /// Upper bound on the total time spent retrying the initial store connect.
    pub db_connect_max_retry: Duration,
    pub similarity_threshold: f64,
    pub corpus_policy: CorpusPolicy,
    pub recent_posts_limit: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            db_connect_max_retry: Duration::from_secs(parse_env("DB_CONNECT_MAX_RETRY_SECS", 30)?),
            similarity_threshold: parse_env("SIMILARITY_THRESHOLD", DEFAULT_THRESHOLD)?,
            corpus_policy: parse_env("SIMILARITY_CORPUS", CorpusPolicy::All)?,
            recent_posts_limit: parse_env("RECENT_POSTS_LIMIT", 10)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} is invalid ('{raw}'): {e}")),
        Err(_) => Ok(default),
    }
}
