use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub upload_dir: String,
    pub rate_limit_per_minute: u32,
    pub production: bool,
}

impl Config {
    pub fn load() -> Self {
        Self {
            database_url: try_load("DATABASE_URL", "postgres://localhost/food_truck"),
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:3000"),
            upload_dir: try_load("UPLOAD_DIR", "public/uploads"),
            rate_limit_per_minute: try_load("RATE_LIMIT_PER_MINUTE", "20"),
            production: env::var("APP_ENV").is_ok_and(|v| v == "production"),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("invalid {key} value: {e}");
        })
        .expect("environment misconfigured")
}
