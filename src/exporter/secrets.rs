use crate::error::AppError;
use crate::exporter::http::{read_secret_value, service_url};
use crate::exporter::models::{UnwrapSecretRequest, WrappedSecretConfig};
use tracing::info;
use url::Url;

/// Client for the secure key release (SKR) sidecar.
#[derive(Clone)]
pub struct SecretsClient {
    http: reqwest::Client,
    base: Url,
}

impl SecretsClient {
    pub fn new(http: reqwest::Client, base: Url) -> Self {
        Self { http, base }
    }

    /// Ask the sidecar to unwrap the password described by `wrapped`.
    pub async fn get_db_password(
        &self,
        wrapped: &WrappedSecretConfig,
    ) -> Result<String, AppError> {
        let uri = service_url(&self.base, &["secrets", "unwrap"])?;
        let resp = self
            .http
            .post(uri)
            .json(&UnwrapSecretRequest::from(wrapped))
            .send()
            .await?;
        let bytes = read_secret_value(resp, "secrets service").await?;
        let password = String::from_utf8(bytes)?;
        info!(kid = %wrapped.kid, "unwrapped DB password");
        Ok(password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::models::KekConfig;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use mockito::Matcher;
    use serde_json::json;

    fn wrapped() -> WrappedSecretConfig {
        WrappedSecretConfig {
            client_id: "client".to_string(),
            tenant_id: "tenant".to_string(),
            kid: "wrapped-password".to_string(),
            akv_endpoint: "https://vault.example.net".to_string(),
            kek: KekConfig {
                kid: "kek".to_string(),
                akv_endpoint: "https://mhsm.example.net".to_string(),
                maa_endpoint: "https://maa.example.net".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn posts_descriptor_and_returns_plaintext() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/secrets/unwrap")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "kid": "wrapped-password",
                "kek": { "maaEndpoint": "https://maa.example.net" }
            })))
            .with_status(200)
            .with_body(json!({ "value": STANDARD.encode("s3cr3t") }).to_string())
            .create_async()
            .await;

        let base = Url::parse(&server.url()).unwrap();
        let client = SecretsClient::new(reqwest::Client::new(), base);
        let password = client.get_db_password(&wrapped()).await.unwrap();

        assert_eq!(password, "s3cr3t");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn keeps_the_path_prefix_of_the_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/skr/secrets/unwrap")
            .with_status(200)
            .with_body(json!({ "value": STANDARD.encode("pw") }).to_string())
            .create_async()
            .await;

        let base = Url::parse(&format!("{}/skr/", server.url())).unwrap();
        let client = SecretsClient::new(reqwest::Client::new(), base);
        assert_eq!(client.get_db_password(&wrapped()).await.unwrap(), "pw");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/secrets/unwrap")
            .with_status(500)
            .create_async()
            .await;

        let base = Url::parse(&server.url()).unwrap();
        let client = SecretsClient::new(reqwest::Client::new(), base);
        let err = client.get_db_password(&wrapped()).await.unwrap_err();
        match err {
            AppError::UpstreamStatus { service, status } => {
                assert_eq!(service, "secrets service");
                assert_eq!(status.as_u16(), 500);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
