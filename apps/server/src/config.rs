use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use finvault_connect::{PlaidConfig, PlaidEnvironment, DEFAULT_DAYS_REQUESTED};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: String,
    pub plaid: PlaidConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("FV_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid FV_LISTEN_ADDR")?;
        let db_path = env_or("FV_DB_PATH", "./db/finvault.db");
        let cors_allow = env_or("FV_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("FV_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);
        let log_format = env_or("FV_LOG_FORMAT", "text");

        let environment: PlaidEnvironment = env_or("PLAID_ENV", "sandbox")
            .parse()
            .context("Invalid PLAID_ENV")?;
        let days_requested: u32 = env_or("PLAID_DAYS_REQUESTED", "")
            .parse()
            .unwrap_or(DEFAULT_DAYS_REQUESTED);
        let mut plaid = PlaidConfig::new(env_or("PLAID_CLIENT_ID", ""), env_or("PLAID_SECRET", ""))
            .with_environment(environment)
            .with_days_requested(days_requested);
        if let Ok(base_url) = std::env::var("PLAID_BASE_URL") {
            if !base_url.trim().is_empty() {
                plaid = plaid.with_base_url(base_url);
            }
        }

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            log_format,
            plaid,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
