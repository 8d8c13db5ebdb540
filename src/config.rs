//! Process configuration, read from the environment.
//!
//! Both programs are configured the way the orchestrator launches them: plain
//! environment variables (optionally seeded from a `.env` file). Values that
//! used to be hardcoded, the service ports and the poll cadence, have
//! defaults here and can be overridden the same way.

use crate::error::AppError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const COMPRESSOR_KEYS: &[&str] = &["POLL_INTERVAL_SECS", "POLL_MAX_RETRIES", "LOGLEVEL"];
const COMPRESSOR_VERBATIM_KEYS: &[&str] = &["INPUT_LOCATION", "OUTPUT_LOCATION"];

const EXPORTER_KEYS: &[&str] = &[
    "GOVERNANCE_ENDPOINT",
    "SECRETS_ENDPOINT",
    "DB_PORT",
    "HTTP_TIMEOUT_SECS",
    "LOGLEVEL",
];
const EXPORTER_VERBATIM_KEYS: &[&str] = &["OUTPUT_LOCATION", "DB_CONFIG_CGS_SECRET_ID"];

/// Settings for the `file-compressor` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressorConfig {
    pub input_location: PathBuf,
    pub output_location: PathBuf,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_poll_max_retries")]
    pub poll_max_retries: usize,
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

impl CompressorConfig {
    pub fn load() -> Result<Self, AppError> {
        let figment = Figment::new().merge(Env::raw().only(COMPRESSOR_KEYS));
        Ok(verbatim(figment, COMPRESSOR_VERBATIM_KEYS).extract()?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Settings for the `db-exporter` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    pub output_location: PathBuf,
    pub db_config_cgs_secret_id: String,
    #[serde(default = "default_governance_endpoint")]
    pub governance_endpoint: Url,
    #[serde(default = "default_secrets_endpoint")]
    pub secrets_endpoint: Url,
    #[serde(default = "default_db_port")]
    pub db_port: u16,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

impl ExporterConfig {
    pub fn load() -> Result<Self, AppError> {
        let figment = Figment::new().merge(Env::raw().only(EXPORTER_KEYS));
        Ok(verbatim(figment, EXPORTER_VERBATIM_KEYS).extract()?)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_poll_max_retries() -> usize {
    300
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_governance_endpoint() -> Url {
    Url::parse("http://localhost:8300").expect("static governance endpoint is a valid URL")
}

fn default_secrets_endpoint() -> Url {
    Url::parse("http://localhost:9300").expect("static secrets endpoint is a valid URL")
}

fn default_db_port() -> u16 {
    5432
}

fn default_http_timeout_secs() -> u64 {
    30
}

/// `Env` guesses a type for every value (`007` becomes `7`). Paths and ids
/// are merged as the exact strings from the environment instead.
fn verbatim(mut figment: Figment, keys: &[&str]) -> Figment {
    for key in keys {
        if let Ok(value) = std::env::var(key) {
            figment = figment.merge(Serialized::default(&key.to_ascii_lowercase(), value));
        }
    }
    figment
}
