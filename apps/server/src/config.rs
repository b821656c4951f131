use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use tracing::warn;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8088";
const DEFAULT_DB_PATH: &str = "./db/issuer-console.db";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    /// When no session resolves, serve the provisioned demo identity.
    pub demo_fallback: bool,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads `ISSUER_*` variables, after loading an optional `.env` file.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = lookup("ISSUER_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("Invalid ISSUER_LISTEN_ADDR")?;
        let db_path = lookup("ISSUER_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());
        let demo_fallback = match lookup("ISSUER_DEMO_FALLBACK") {
            None => true,
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                warn!("Ignoring invalid ISSUER_DEMO_FALLBACK '{}'", raw);
                true
            }),
        };
        let cors_allow = lookup("ISSUER_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms = match lookup("ISSUER_REQUEST_TIMEOUT_MS") {
            None => DEFAULT_TIMEOUT_MS,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid ISSUER_REQUEST_TIMEOUT_MS '{}'", raw);
                DEFAULT_TIMEOUT_MS
            }),
        };
        let log_format = match lookup("ISSUER_LOG_FORMAT") {
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            db_path,
            demo_fallback,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            log_format,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
