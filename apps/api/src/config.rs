use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_JWT_EXPIRY_DAYS: i64 = 7;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    pub frontend_url: String,
    pub environment: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let jwt_secret = require_env("JWT_SECRET")?;
        anyhow::ensure!(!jwt_secret.is_empty(), "JWT_SECRET must not be empty");

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            jwt_secret,
            jwt_expiry_days: std::env::var("JWT_EXPIRY_DAYS")
                .unwrap_or_else(|_| DEFAULT_JWT_EXPIRY_DAYS.to_string())
                .parse::<i64>()
                .context("JWT_EXPIRY_DAYS must be a whole number of days")?,
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
