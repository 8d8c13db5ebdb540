use crate::error::AppError;
use crate::exporter::models::SecretValue;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// Plain HTTP/1 client for the sidecar services on the local network.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .user_agent("cleanroom-db-exporter/0.3")
        .connect_timeout(Duration::from_secs(5))
        .timeout(timeout)
        .http1_only()
        .build()?;
    Ok(client)
}

/// Append `segments` to the path of `base`, keeping any prefix it carries.
/// Each segment is percent-encoded on its own, so `/` in an id stays inside it.
pub(crate) fn service_url(base: &Url, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Check for 200, then unpack the base64 `value` field of the body.
pub(crate) async fn read_secret_value(
    resp: reqwest::Response,
    service: &'static str,
) -> Result<Vec<u8>, AppError> {
    let status = resp.status();
    if status != StatusCode::OK {
        return Err(AppError::UpstreamStatus { service, status });
    }
    let body = resp.bytes().await?;
    let envelope: SecretValue = serde_json::from_slice(&body)?;
    Ok(STANDARD.decode(envelope.value)?)
}
