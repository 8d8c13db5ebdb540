//! Export the rows of a fixed query to a text file on the output share.
//!
//! Layout:
//! - `models.rs`: wire types of the secret services and the exported row
//! - `http.rs`: shared HTTP client and the `{"value": <base64>}` unpacking
//! - `governance.rs`: DB config lookup through the governance service
//! - `secrets.rs`: password unwrap through the key release sidecar
//! - `db.rs`: PostgreSQL connection, query cursor and row writer

pub mod db;
pub mod governance;
pub mod http;
pub mod models;
pub mod secrets;

pub use governance::GovernanceClient;
pub use models::{DbConfig, KekConfig, UserRow, WrappedSecretConfig};
pub use secrets::SecretsClient;

use crate::config::ExporterConfig;
use crate::error::AppError;
use futures::Stream;
use sqlx::Connection;
use std::path::Path;
use tokio::fs::File;
use tokio::io::BufWriter;
use tracing::info;

pub const OUTPUT_FILE_NAME: &str = "output.txt";

/// Run the exporter once and return the number of rows written.
///
/// The output file is only created after both secrets were fetched and the
/// database answered, so an early failure leaves the output share untouched.
pub async fn run(cfg: &ExporterConfig) -> Result<u64, AppError> {
    let http = http::build_client(cfg.http_timeout())?;

    let governance = GovernanceClient::new(http.clone(), cfg.governance_endpoint.clone());
    let db_config = governance
        .get_db_config(&cfg.db_config_cgs_secret_id)
        .await?;

    let secrets = SecretsClient::new(http, cfg.secrets_endpoint.clone());
    let password = secrets.get_db_password(&db_config.password).await?;

    let mut conn = db::connect(&db_config, &password, cfg.db_port).await?;

    info!("executing query");
    let output_path = cfg.output_location.join(OUTPUT_FILE_NAME);
    let count = write_output(db::stream_users(&mut conn), &output_path).await?;
    conn.close().await?;

    info!(
        rows = count,
        "{} rows as output written to {}", count, OUTPUT_FILE_NAME
    );
    Ok(count)
}

/// Create (or truncate) `path`, write every row to it and sync it to disk.
/// The file exists afterwards even when `rows` is empty.
pub async fn write_output<S>(rows: S, path: &Path) -> Result<u64, AppError>
where
    S: Stream<Item = Result<UserRow, AppError>> + Unpin,
{
    let mut out = BufWriter::new(File::create(path).await?);
    let count = db::write_rows(rows, &mut out).await?;
    out.into_inner().sync_all().await?;
    Ok(count)
}
