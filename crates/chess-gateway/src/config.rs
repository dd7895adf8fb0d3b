//! Process configuration, loaded once at startup: env-var driven, validated
//! eagerly so a bad deploy fails at boot rather than mid-request.

use std::env;

use chess_core::error::{ChessError, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub redis_url: String,
    pub bind_addr: String,
}

impl Config {
    /// Loads from process environment, optionally seeded by a `.env` file.
    /// A missing `JWT_SECRET` or `REDIS_URL` is a startup-time error, not a
    /// panic at first use.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = non_empty_env("JWT_SECRET")?;
        let redis_url = non_empty_env("REDIS_URL")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Self { jwt_secret, redis_url, bind_addr })
    }
}

fn non_empty_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ChessError::Internal(format!("{key} is required"))),
    }
}
