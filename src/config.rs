use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;
use tracing::Level;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// MySQL connection string. Without it the portal runs on the in-memory store.
    pub database_url: Option<String>,
    pub api_prefix: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    // Logging
    pub log_dir: PathBuf,
    pub log_level: Level,

    /// JSON fixtures loaded into the in-memory store at start-up.
    pub seed_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: optional_var("DATABASE_URL"),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            rate_protected_per_min: parse_var("RATE_PROTECTED_PER_MIN", 1000)?,
            log_dir: optional_var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
            log_level: parse_var("LOG_LEVEL", Level::DEBUG)?,
            seed_dir: optional_var("SEED_DIR").map(PathBuf::from),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            database_url: None,
            api_prefix: "/api".to_string(),
            rate_protected_per_min: 1000,
            log_dir: PathBuf::from("logs"),
            log_level: Level::DEBUG,
            seed_dir: None,
        }
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match optional_var(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_and_levels() {
        assert_eq!(parse_value::<u32>("RATE", " 60 ").unwrap(), 60);
        assert_eq!(parse_value::<Level>("LOG_LEVEL", "info").unwrap(), Level::INFO);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = parse_value::<u32>("RATE_PROTECTED_PER_MIN", "lots").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("RATE_PROTECTED_PER_MIN"));
    }

    #[test]
    fn default_runs_in_memory() {
        let config = Config::default();
        assert!(config.database_url.is_none());
        assert_eq!(config.api_prefix, "/api");
    }
}
