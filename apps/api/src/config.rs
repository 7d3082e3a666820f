use anyhow::{ensure, Context, Result};

use crate::journey::progress::{JourneyRules, DEFAULT_LEVEL_XP_THRESHOLD};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub level_xp_threshold: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let level_xp_threshold = match std::env::var("JOURNEY_LEVEL_XP") {
            Ok(raw) => parse_level_xp(&raw)?,
            Err(_) => DEFAULT_LEVEL_XP_THRESHOLD,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            level_xp_threshold,
        })
    }

    pub fn journey_rules(&self) -> JourneyRules {
        JourneyRules {
            level_xp_threshold: self.level_xp_threshold,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_level_xp(raw: &str) -> Result<u32> {
    let value = raw
        .trim()
        .parse::<u32>()
        .context("JOURNEY_LEVEL_XP must be a positive integer")?;
    ensure!(value > 0, "JOURNEY_LEVEL_XP must be greater than zero");
    Ok(value)
}
