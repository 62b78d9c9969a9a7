use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub uploads_dir: String,
    /// Bearer token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("VOTEBD_PORT", "3000"),
            database_url: try_load("DATABASE_URL", "sqlite:votebd.db"),
            uploads_dir: try_load("VOTEBD_UPLOADS_DIR", "public/uploads"),
            token_ttl_secs: try_load("VOTEBD_TOKEN_TTL_SECS", "604800"),
            max_upload_bytes: try_load("VOTEBD_MAX_UPLOAD_BYTES", "5242880"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| ())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
