use anyhow::{bail, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use service_core::config as core_config;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://pay.giyapay.com";
pub const DEFAULT_SECRET_HEADER: &str = "x-secret-key";

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub gateway: GatewayConfig,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    /// Directory holding `success.html`, `error.html`, `cancel.html` and any
    /// other files served as static fallbacks.
    pub static_dir: PathBuf,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL, e.g. `sqlite://transactions.db` or `sqlite::memory:`.
    pub url: String,
    pub max_connections: u32,
}

#[derive(Deserialize, Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Send the merchant secret as a `secretKey` query parameter instead of a
    /// header. Only for gateways that insist on the legacy form.
    pub secret_in_query: bool,
    pub secret_header: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let common = core_config::Config::load()?;

        let host = env::var("HOST").unwrap_or(common.host);
        let port = match env::var("PORT") {
            Ok(port) => port.parse()?,
            Err(_) => common.port,
        };

        let db_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://transactions.db".to_string());
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let gateway_base_url =
            env::var("GATEWAY_BASE_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_BASE_URL.to_string());
        let secret_in_query = match env::var("GATEWAY_SECRET_IN_QUERY") {
            Ok(value) => parse_flag("GATEWAY_SECRET_IN_QUERY", &value)?,
            Err(_) => false,
        };
        let secret_header = env::var("GATEWAY_SECRET_HEADER")
            .unwrap_or_else(|_| DEFAULT_SECRET_HEADER.to_string());
        let timeout_secs = env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections,
            },
            gateway: GatewayConfig {
                base_url: gateway_base_url.trim_end_matches('/').to_string(),
                secret_in_query,
                secret_header,
                timeout_secs,
            },
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "transaction-service".to_string()),
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info,transaction_service=debug,sqlx=warn".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
        })
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => bail!("Invalid boolean for {}: '{}'", name, other),
    }
}
