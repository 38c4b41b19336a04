use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const SERVICE_TITLE: &str = "Custom Backend Ops TEST";
pub const SERVICE_VERSION: &str = "0.1.0";

/// Used when `RUST_LOG` is unset: store events at debug, one line per request.
pub const DEFAULT_LOG_FILTER: &str = "backend_ops=debug,tower_http::trace=debug";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let data_file = env::var("ITEMS_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_file());

        Ok(Self {
            host,
            port,
            data_file,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `db/data.json` next to the service sources.
pub fn default_data_file() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("db")
        .join("data.json")
}
