use crate::error::AppError;
use crate::exporter::http::{read_secret_value, service_url};
use crate::exporter::models::DbConfig;
use tracing::info;
use url::Url;

/// Client for the local governance service (CGS) secret endpoint.
#[derive(Clone)]
pub struct GovernanceClient {
    http: reqwest::Client,
    base: Url,
}

impl GovernanceClient {
    pub fn new(http: reqwest::Client, base: Url) -> Self {
        Self { http, base }
    }

    /// `POST /secrets/{id}`; the secret holds base64-encoded `DbConfig` JSON.
    pub async fn get_db_config(&self, secret_id: &str) -> Result<DbConfig, AppError> {
        let uri = service_url(&self.base, &["secrets", secret_id])?;
        let resp = self.http.post(uri).send().await?;
        let bytes = read_secret_value(resp, "governance service").await?;
        let cfg: DbConfig = serde_json::from_slice(&bytes)?;
        info!(
            endpoint = %cfg.endpoint,
            user = %cfg.user,
            database = %cfg.name,
            "retrieved DB config"
        );
        Ok(cfg)
    }
}
